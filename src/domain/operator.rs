/// The signed-in administrator on whose behalf records are written.
///
/// Passed explicitly into every submit so the audit columns (`creby`, `modby`)
/// never depend on ambient session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
}

impl Operator {
    pub const FALLBACK_NAME: &'static str = "admin";

    /// Creates an operator, falling back to `admin` for a blank name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Self::default()
        } else {
            Self { name }
        }
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self {
            name: Self::FALLBACK_NAME.to_string(),
        }
    }
}
