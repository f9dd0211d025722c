use crate::state::StatePath;

/// Decides which mutations are eligible for persistence.
///
/// With no configured paths every mutation is eligible; otherwise the
/// mutation type must start with the namespace form of one of the paths.
#[derive(Debug, Clone, Default)]
pub struct MutationFilter {
    prefixes: Vec<String>,
}

impl MutationFilter {
    pub fn new(paths: &[StatePath]) -> Self {
        Self {
            prefixes: paths.iter().map(StatePath::namespace).collect(),
        }
    }

    pub fn is_eligible(&self, kind: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| kind.starts_with(p.as_str()))
    }
}
