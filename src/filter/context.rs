//! Per-call filter context.

use crate::asset::containing_dir;
use crate::config::Options;

/// Variables exposed to templates.
pub type Vars = serde_json::Map<String, serde_json::Value>;

/// Read-only data handed to a filter for one invocation.
///
/// Built fresh by the caller for every asset; filters only ever see a shared
/// reference.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    dir: &'a str,
    vars: &'a Vars,
    options: &'a Options,
}

impl<'a> FilterContext<'a> {
    pub fn new(dir: &'a str, options: &'a Options, vars: &'a Vars) -> Self {
        Self { dir, vars, options }
    }

    /// Context whose directory is the identity's containing directory.
    pub fn for_asset(identity: &'a str, options: &'a Options, vars: &'a Vars) -> Self {
        Self::new(containing_dir(identity), options, vars)
    }

    /// Logical directory of the asset being processed; empty at top level.
    pub fn dir(&self) -> &'a str {
        self.dir
    }

    pub fn vars(&self) -> &'a Vars {
        self.vars
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_asset_derives_dir() {
        let options = Options::new();
        let vars = Vars::new();
        assert_eq!(
            FilterContext::for_asset("styles/main.css", &options, &vars).dir(),
            "styles"
        );
        assert_eq!(FilterContext::for_asset("main.css", &options, &vars).dir(), "");
    }
}
