//! WML text rendering

use std::fmt;

use super::Config;

const INDENT: &str = "    ";

impl Config {
    fn write_wml(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        for (key, value) in self.attributes() {
            // Quotes inside WML strings are doubled
            writeln!(f, "{indent}{key}=\"{}\"", value.str().replace('"', "\"\""))?;
        }
        for (tag, child) in self.all_children() {
            writeln!(f, "{indent}[{tag}]")?;
            child.write_wml(f, depth + 1)?;
            writeln!(f, "{indent}[/{tag}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_wml(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_renders_nothing() {
        assert_eq!(Config::new().to_string(), "");
    }

    #[test]
    fn test_render_nested() {
        let mut cfg = Config::new().with("turn", 2);
        let side = cfg.add_child("side");
        side.set("gold", 100);
        side.add_child("unit").set("name", "say \"hi\"");
        cfg.add_child("side");

        let expected = "turn=\"2\"\n\
                        [side]\n\
                        \x20   gold=\"100\"\n\
                        \x20   [unit]\n\
                        \x20       name=\"say \"\"hi\"\"\"\n\
                        \x20   [/unit]\n\
                        [/side]\n\
                        [side]\n\
                        [/side]\n";
        assert_eq!(cfg.to_string(), expected);
    }
}
