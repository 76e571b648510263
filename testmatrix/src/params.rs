//! Build parameters of one test-matrix executable.
//!
//! The framework fixes these four strings when it compiles a variant. They are
//! printed verbatim and never interpreted.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Label preceding the compiler-parameter string.
pub const COMPILER_PARAMS_LABEL: &str = "__CXXPARAMS__: ";
/// Label preceding the linker-parameter string.
pub const LINKER_PARAMS_LABEL: &str = "__LDPARAMS__: ";

/// The identifiers baked into one build of a test executable.
///
/// The executable identifier and both parameter strings are required; only
/// the case label may be absent. Values injected with `env!` stay borrowed,
/// values loaded from a manifest are owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParameters {
    /// Logical name of the executable / build variant
    pub executable: Cow<'static, str>,
    /// Optional sub-case discriminator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<Cow<'static, str>>,
    /// Compiler flags used for this build
    pub compiler_params: Cow<'static, str>,
    /// Linker flags used for this build
    pub linker_params: Cow<'static, str>,
}

impl BuildParameters {
    pub fn new(
        executable: impl Into<Cow<'static, str>>,
        compiler_params: impl Into<Cow<'static, str>>,
        linker_params: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            executable: executable.into(),
            case: None,
            compiler_params: compiler_params.into(),
            linker_params: linker_params.into(),
        }
    }

    /// Build from string constants. This is what [`build_parameters!`] expands to.
    ///
    /// [`build_parameters!`]: crate::build_parameters
    pub const fn from_static(
        executable: &'static str,
        case: Option<&'static str>,
        compiler_params: &'static str,
        linker_params: &'static str,
    ) -> Self {
        let case = match case {
            Some(case) => Some(Cow::Borrowed(case)),
            None => None,
        };
        Self {
            executable: Cow::Borrowed(executable),
            case,
            compiler_params: Cow::Borrowed(compiler_params),
            linker_params: Cow::Borrowed(linker_params),
        }
    }

    pub fn with_case(mut self, case: impl Into<Cow<'static, str>>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// The case label, if one was supplied. An empty label counts as absent.
    pub fn case_label(&self) -> Option<&str> {
        self.case.as_deref().filter(|case| !case.is_empty())
    }

    /// `[<executable>]`, or `[<executable>-run<case>]` when a case label is present.
    pub fn identification_line(&self) -> String {
        match self.case_label() {
            Some(case) => format!("[{}-run{}]", self.executable, case),
            None => format!("[{}]", self.executable),
        }
    }
}

/// Renders the startup block: identification line, compiler parameters, linker
/// parameters, each terminated by a newline.
impl fmt::Display for BuildParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.identification_line())?;
        writeln!(f, "{}{}", COMPILER_PARAMS_LABEL, self.compiler_params)?;
        writeln!(f, "{}{}", LINKER_PARAMS_LABEL, self.linker_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_without_case() {
        let params = BuildParameters::new("mytest", "-O2 -std=c++20", "-lpthread");
        assert_eq!(
            params.to_string(),
            "[mytest]\n__CXXPARAMS__: -O2 -std=c++20\n__LDPARAMS__: -lpthread\n"
        );
    }

    #[test]
    fn test_block_with_case() {
        let params = BuildParameters::new("mytest", "-O2 -std=c++20", "-lpthread").with_case("3");
        assert_eq!(params.identification_line(), "[mytest-run3]");
        assert_eq!(
            params.to_string().lines().collect::<Vec<_>>(),
            vec!["[mytest-run3]", "__CXXPARAMS__: -O2 -std=c++20", "__LDPARAMS__: -lpthread"]
        );
    }

    #[test]
    fn test_empty_case_is_absent() {
        let params = BuildParameters::from_static("mytest", Some(""), "", "");
        assert_eq!(params.case_label(), None);
        assert_eq!(params.identification_line(), "[mytest]");
    }

    #[test]
    fn test_values_printed_verbatim() {
        let params = BuildParameters::new("odd name", "", "  -Wl,--as-needed  ");
        let block = params.to_string();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "[odd name]");
        assert_eq!(lines[1], "__CXXPARAMS__: ");
        assert_eq!(lines[2], "__LDPARAMS__:   -Wl,--as-needed  ");
    }

    #[test]
    fn test_from_static_in_const_context() {
        static PARAMS: BuildParameters =
            BuildParameters::from_static("constexe", Some("7"), "-O0", "-lm");
        assert_eq!(PARAMS.identification_line(), "[constexe-run7]");
        assert!(matches!(PARAMS.executable, Cow::Borrowed(_)));
    }

    #[test]
    fn test_manifest_requires_executable() {
        let json = r#"{"compiler_params": "-O2", "linker_params": "-lpthread"}"#;
        let parsed: Result<BuildParameters, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_manifest_case_is_optional() {
        let json = r#"{"executable": "mytest", "compiler_params": "-O2", "linker_params": "-lpthread"}"#;
        let parsed: BuildParameters = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, BuildParameters::new("mytest", "-O2", "-lpthread"));

        let json = r#"{"executable": "mytest", "case": "2", "compiler_params": "", "linker_params": ""}"#;
        let parsed: BuildParameters = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.identification_line(), "[mytest-run2]");
    }
}
