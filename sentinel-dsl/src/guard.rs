use sentinel_types::Environment;

use crate::error::{EvalError, ParseError};
use crate::lexer::Polarity;
use crate::parser::{parse, SyntaxTree};

/// A single endpoint's compiled policy: an expression tree plus the polarity
/// it was declared with. `Guard::check` is the only place polarity and
/// expression result are combined.
pub struct Guard {
    express: String,
    tree: SyntaxTree,
}

impl Guard {
    pub fn new(express: impl Into<String>) -> Result<Self, ParseError> {
        let express = express.into();
        let tree = parse(&express)?;
        Ok(Self { express, tree })
    }

    pub fn express(&self) -> &str {
        &self.express
    }

    /// Evaluates the guard's expression against `env` and applies its
    /// polarity. An absent expression tree (a bare `allow`/`deny` with no
    /// condition) is an unconditional decision. If the expression evaluates
    /// to a non-boolean value, that's logged as a warning and the check
    /// returns `false` outright — matching spec §4.4's pseudocode and the
    /// original's `guard.go`, both of which return the non-boolean-result
    /// `false` *before* the allow/deny inversion, not after.
    pub fn check(&self, env: &Environment<'_>) -> Result<bool, EvalError> {
        let matched = match &self.tree.root {
            None => true,
            Some(root) => {
                let value = root.evaluate(env)?;
                match value.as_bool() {
                    Some(b) => b,
                    None => {
                        tracing::warn!(
                            expression = %self.express,
                            value = %value,
                            "policy expression evaluated to a non-boolean result; treating as false"
                        );
                        return Ok(false);
                    }
                }
            }
        };

        Ok(match self.tree.polarity {
            Polarity::Allow => matched,
            Polarity::Deny => !matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_types::StaticPrincipal;

    #[test]
    fn allow_and_deny_are_complementary() {
        let principal = StaticPrincipal::new("u").with_roles(["admin"]);
        let env = Environment::new(&principal);
        let allow = Guard::new("allow: Role('admin')").unwrap();
        let deny = Guard::new("deny: Role('admin')").unwrap();
        let a = allow.check(&env).unwrap();
        let d = deny.check(&env).unwrap();
        assert_ne!(a, d);
        assert!(a);
    }

    #[test]
    fn bare_polarity_is_unconditional() {
        let principal = StaticPrincipal::new("u");
        let env = Environment::new(&principal);
        assert!(Guard::new("allow").unwrap().check(&env).unwrap());
        assert!(!Guard::new("deny").unwrap().check(&env).unwrap());
    }

    #[test]
    fn non_bool_result_is_treated_as_false() {
        let principal = StaticPrincipal::new("u");
        let env = Environment::new(&principal);
        let guard = Guard::new("allow: 'not a bool'").unwrap();
        assert!(!guard.check(&env).unwrap());
    }

    #[test]
    fn non_bool_result_is_false_regardless_of_polarity() {
        // A non-boolean result is rejected before the allow/deny inversion
        // is applied, so `deny` must not flip it into `true`.
        let principal = StaticPrincipal::new("u");
        let env = Environment::new(&principal);
        let guard = Guard::new("deny: 'not a bool'").unwrap();
        assert!(!guard.check(&env).unwrap());
    }
}
