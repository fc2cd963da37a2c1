//! Built-in keyword registry and variables the documentation leaves out.

use docschema_shared::{Keyword, Variable};

/// Keywords known to the configuration language, with the heading that
/// documents each of them.
pub fn builtin_keywords() -> Vec<Keyword> {
    vec![
        Keyword::new("monitor", "Monitors", "general"),
        Keyword::new("exec", "Keywords", "executing"),
        Keyword::new("exec-once", "Keywords", "executing"),
        Keyword::new("exec-shutdown", "Keywords", "executing"),
        Keyword::new("source", "Keywords", "sourcing-multi-file"),
        Keyword::new("env", "Keywords", "environment"),
        Keyword::new("device", "Keywords", "per-device-input-configs"),
        Keyword::new("submap", "Keywords", "submaps"),
        Keyword::new("bind", "Binds", "basic"),
        Keyword::new("bindm", "Binds", "mouse-binds"),
        Keyword::new("$", "", "").with_description(
            "Defines a variable: `$name = value`. Use it anywhere later with `$name`.",
        ),
    ]
}

/// Variables accepted by the parser but absent from the tables, keyed by the
/// name of the section they belong to.
pub fn undocumented_variables() -> Vec<(String, Vec<Variable>)> {
    vec![(
        "General".to_string(),
        vec![Variable::new(
            "autogenerated",
            "Whether this configuration was autogenerated",
            "bool",
            "1",
        )],
    )]
}
