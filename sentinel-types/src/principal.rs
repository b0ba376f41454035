/// The identity a check is evaluated against. The engine never constructs or
/// mutates a principal — callers own that and lend the engine a reference
/// for the duration of a single check.
pub trait Principal {
    fn id(&self) -> &str;
    fn roles(&self) -> &[String];
    fn permissions(&self) -> &[String];
    fn groups(&self) -> &[String];
}

/// A ready-made `Principal` for callers that don't already have their own
/// identity type, grounded on the plain struct the original project's own
/// guard/sentinel tests construct directly rather than going through a
/// richer identity system.
#[derive(Debug, Clone, Default)]
pub struct StaticPrincipal {
    pub id: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub groups: Vec<String>,
}

impl StaticPrincipal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permissions(
        mut self,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

impl Principal for StaticPrincipal {
    fn id(&self) -> &str {
        &self.id
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn permissions(&self) -> &[String] {
        &self.permissions
    }

    fn groups(&self) -> &[String] {
        &self.groups
    }
}
