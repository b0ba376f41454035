use sentinel_types::{Environment, Number, TypeMask, Value};

use crate::error::{EvalError, EvalErrorKind};
use crate::lexer::{ComparisonOp, LogicOp, MathOp};

/// How many operands a node takes, mirroring the original's `Kind()`
/// (0 = leaf, 1 = unary, 2 = binary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Leaf,
    Unary,
    Binary,
}

/// A single AST node. Built bottom-up by the parser with every child already
/// parsed, type-checked, and bound at construction time — there is no
/// `change_left`/`change_right` mutation anywhere in this enum, unlike the
/// original's `Syntax` interface, which rewrites its children in place while
/// resolving operator precedence (see the parser module for why that's not
/// needed here).
#[derive(Debug, Clone)]
pub enum Node {
    Constant(Value),
    PathParam(String),
    CustomParam(String),
    Role(String),
    Roles(Vec<String>),
    Permission(String),
    Permissions(Vec<String>),
    Group(String),
    Groups(Vec<String>),
    Negate(Box<Node>),
    Math(MathOp, Box<Node>, Box<Node>),
    Comparison(ComparisonOp, Box<Node>, Box<Node>),
    Logic(LogicOp, Box<Node>, Box<Node>),
}

impl Node {
    pub fn priority(&self) -> u8 {
        match self {
            Node::Constant(_)
            | Node::PathParam(_)
            | Node::CustomParam(_)
            | Node::Role(_)
            | Node::Roles(_)
            | Node::Permission(_)
            | Node::Permissions(_)
            | Node::Group(_)
            | Node::Groups(_) => 100,
            Node::Negate(_) => 20,
            Node::Math(MathOp::Mul | MathOp::Div | MathOp::Mod, _, _) => 30,
            Node::Math(MathOp::Add | MathOp::Sub, _, _) => 35,
            Node::Comparison(ComparisonOp::Lt | ComparisonOp::Lte | ComparisonOp::Gt | ComparisonOp::Gte, _, _) => 50,
            Node::Comparison(ComparisonOp::Eq | ComparisonOp::NotEq, _, _) => 55,
            Node::Logic(_, _, _) => 60,
        }
    }

    pub fn kind(&self) -> Arity {
        match self {
            Node::Constant(_)
            | Node::PathParam(_)
            | Node::CustomParam(_)
            | Node::Role(_)
            | Node::Roles(_)
            | Node::Permission(_)
            | Node::Permissions(_)
            | Node::Group(_)
            | Node::Groups(_) => Arity::Leaf,
            Node::Negate(_) => Arity::Unary,
            Node::Math(..) | Node::Comparison(..) | Node::Logic(..) => Arity::Binary,
        }
    }

    /// The type mask this node's evaluated value is guaranteed to fall in,
    /// used by the parser to type-check an operator against its operands
    /// before the node is even built.
    pub fn return_mask(&self) -> TypeMask {
        match self {
            Node::Constant(v) => v.type_mask(),
            // Path bindings can hold a caller-inserted `Value::Number` (the
            // trie itself only ever binds strings, but `Environment` accepts
            // any `Value` directly), so this stays broad. `env.custom` is a
            // `HashMap<String, String>` end to end — always a string.
            Node::PathParam(_) => TypeMask::STRING | TypeMask::NUMBER,
            Node::CustomParam(_) => TypeMask::STRING,
            Node::Role(_)
            | Node::Roles(_)
            | Node::Permission(_)
            | Node::Permissions(_)
            | Node::Group(_)
            | Node::Groups(_) => TypeMask::BOOL,
            Node::Negate(_) => TypeMask::BOOL,
            Node::Math(..) => TypeMask::NUMBER,
            Node::Comparison(..) => TypeMask::BOOL,
            Node::Logic(..) => TypeMask::BOOL,
        }
    }

    pub fn evaluate(&self, env: &Environment<'_>) -> Result<Value, EvalError> {
        Ok(match self {
            Node::Constant(v) => v.clone(),
            Node::PathParam(name) => env.path_binding(name),
            Node::CustomParam(name) => env.custom_param(name),
            Node::Role(name) => Value::Bool(env.principal.roles().iter().any(|r| r == name)),
            Node::Roles(names) => {
                Value::Bool(env.principal.roles().iter().any(|r| names.contains(r)))
            }
            Node::Permission(name) => {
                Value::Bool(env.principal.permissions().iter().any(|p| p == name))
            }
            Node::Permissions(names) => Value::Bool(
                env.principal
                    .permissions()
                    .iter()
                    .any(|p| names.contains(p)),
            ),
            Node::Group(name) => Value::Bool(env.principal.groups().iter().any(|g| g == name)),
            Node::Groups(names) => {
                Value::Bool(env.principal.groups().iter().any(|g| names.contains(g)))
            }
            Node::Negate(inner) => {
                let v = inner.evaluate(env)?;
                Value::Bool(!v.as_bool().unwrap_or(false))
            }
            Node::Math(op, lhs, rhs) => eval_math(*op, lhs.evaluate(env)?, rhs.evaluate(env)?)?,
            Node::Comparison(op, lhs, rhs) => {
                eval_comparison(*op, lhs.evaluate(env)?, rhs.evaluate(env)?)?
            }
            // No short-circuiting: both operands are always evaluated.
            Node::Logic(op, lhs, rhs) => {
                let l = lhs.evaluate(env)?;
                let r = rhs.evaluate(env)?;
                let (l, r) = (l.as_bool().unwrap_or(false), r.as_bool().unwrap_or(false));
                Value::Bool(match op {
                    LogicOp::And => l && r,
                    LogicOp::Or => l || r,
                })
            }
        })
    }
}

fn coerce_number(v: &Value) -> Result<Number, EvalError> {
    match v {
        Value::Number(n) => Ok(*n),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Number::Int)
            .or_else(|_| s.trim().parse::<f64>().map(Number::Float))
            .map_err(|_| EvalError::new(EvalErrorKind::NumericCoercionFailed(s.clone()))),
        Value::Bool(b) => Err(EvalError::new(EvalErrorKind::NumericCoercionFailed(
            b.to_string(),
        ))),
    }
}

fn eval_math(op: MathOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    let (l, r) = (coerce_number(&lhs)?, coerce_number(&rhs)?);
    let result = match (l, r) {
        (Number::Int(a), Number::Int(b)) => match op {
            MathOp::Add => Number::Int(a.wrapping_add(b)),
            MathOp::Sub => Number::Int(a.wrapping_sub(b)),
            MathOp::Mul => Number::Int(a.wrapping_mul(b)),
            MathOp::Div => {
                if b == 0 {
                    return Err(EvalError::new(EvalErrorKind::DivideByZero));
                }
                Number::Int(a / b)
            }
            MathOp::Mod => {
                if b == 0 {
                    return Err(EvalError::new(EvalErrorKind::DivideByZero));
                }
                Number::Int(a % b)
            }
        },
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            match op {
                MathOp::Add => Number::Float(a + b),
                MathOp::Sub => Number::Float(a - b),
                MathOp::Mul => Number::Float(a * b),
                MathOp::Div => Number::Float(a / b),
                MathOp::Mod => return Err(EvalError::new(EvalErrorKind::FloatModulo)),
            }
        }
    };
    Ok(Value::Number(result))
}

fn eval_comparison(op: ComparisonOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    let result = match op {
        ComparisonOp::Eq => lhs == rhs,
        ComparisonOp::NotEq => lhs != rhs,
        ComparisonOp::Lt | ComparisonOp::Lte | ComparisonOp::Gt | ComparisonOp::Gte => {
            let l = lhs
                .as_f64()
                .ok_or_else(|| EvalError::new(EvalErrorKind::NumericCoercionFailed(lhs.to_string())))?;
            let r = rhs
                .as_f64()
                .ok_or_else(|| EvalError::new(EvalErrorKind::NumericCoercionFailed(rhs.to_string())))?;
            match op {
                ComparisonOp::Lt => l < r,
                ComparisonOp::Lte => l <= r,
                ComparisonOp::Gt => l > r,
                ComparisonOp::Gte => l >= r,
                ComparisonOp::Eq | ComparisonOp::NotEq => unreachable!(),
            }
        }
    };
    Ok(Value::Bool(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_types::StaticPrincipal;

    fn env(principal: &StaticPrincipal) -> Environment<'_> {
        Environment::new(principal)
    }

    #[test]
    fn negate_double_is_identity() {
        let p = StaticPrincipal::new("u");
        let e = env(&p);
        let inner = Node::Constant(Value::Bool(true));
        let once = Node::Negate(Box::new(inner.clone()));
        let twice = Node::Negate(Box::new(once));
        assert_eq!(twice.evaluate(&e).unwrap(), inner.evaluate(&e).unwrap());
    }

    #[test]
    fn logic_does_not_short_circuit_on_type_errors() {
        // Both sides are plain bools here; this just confirms evaluation
        // order doesn't change the boolean result for and/or.
        let p = StaticPrincipal::new("u");
        let e = env(&p);
        let node = Node::Logic(
            LogicOp::Or,
            Box::new(Node::Constant(Value::Bool(true))),
            Box::new(Node::Constant(Value::Bool(false))),
        );
        assert_eq!(node.evaluate(&e).unwrap(), Value::Bool(true));
    }

    #[test]
    fn logic_operators_are_commutative_on_error_free_inputs() {
        let p = StaticPrincipal::new("u");
        for (a, b) in [(true, true), (true, false), (false, true), (false, false)] {
            let e = env(&p);
            let and_ab = Node::Logic(
                LogicOp::And,
                Box::new(Node::Constant(Value::Bool(a))),
                Box::new(Node::Constant(Value::Bool(b))),
            );
            let and_ba = Node::Logic(
                LogicOp::And,
                Box::new(Node::Constant(Value::Bool(b))),
                Box::new(Node::Constant(Value::Bool(a))),
            );
            assert_eq!(and_ab.evaluate(&e).unwrap(), and_ba.evaluate(&e).unwrap());

            let or_ab = Node::Logic(
                LogicOp::Or,
                Box::new(Node::Constant(Value::Bool(a))),
                Box::new(Node::Constant(Value::Bool(b))),
            );
            let or_ba = Node::Logic(
                LogicOp::Or,
                Box::new(Node::Constant(Value::Bool(b))),
                Box::new(Node::Constant(Value::Bool(a))),
            );
            assert_eq!(or_ab.evaluate(&e).unwrap(), or_ba.evaluate(&e).unwrap());
        }
    }

    #[test]
    fn modulo_on_float_is_an_error() {
        let p = StaticPrincipal::new("u");
        let e = env(&p);
        let node = Node::Math(
            MathOp::Mod,
            Box::new(Node::Constant(Value::Number(Number::Float(3.5)))),
            Box::new(Node::Constant(Value::Number(Number::Float(2.0)))),
        );
        assert!(matches!(
            node.evaluate(&e).unwrap_err().kind,
            EvalErrorKind::FloatModulo
        ));
    }

    #[test]
    fn integer_division_by_zero_is_an_error() {
        let p = StaticPrincipal::new("u");
        let e = env(&p);
        let node = Node::Math(
            MathOp::Div,
            Box::new(Node::Constant(Value::Number(Number::Int(1)))),
            Box::new(Node::Constant(Value::Number(Number::Int(0)))),
        );
        assert!(matches!(
            node.evaluate(&e).unwrap_err().kind,
            EvalErrorKind::DivideByZero
        ));
    }

    #[test]
    fn ordered_comparison_coerces_string_operand() {
        let p = StaticPrincipal::new("u");
        let e = env(&p);
        let node = Node::Comparison(
            ComparisonOp::Gte,
            Box::new(Node::Constant(Value::String("20".into()))),
            Box::new(Node::Constant(Value::Number(Number::Int(18)))),
        );
        assert_eq!(node.evaluate(&e).unwrap(), Value::Bool(true));
    }

    #[test]
    fn role_predicate_checks_membership() {
        let p = StaticPrincipal::new("u").with_roles(["admin"]);
        let e = env(&p);
        assert_eq!(
            Node::Role("admin".into()).evaluate(&e).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Node::Role("other".into()).evaluate(&e).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn roles_predicate_checks_intersection() {
        let p = StaticPrincipal::new("u").with_roles(["editor"]);
        let e = env(&p);
        assert_eq!(
            Node::Roles(vec!["admin".into(), "editor".into()])
                .evaluate(&e)
                .unwrap(),
            Value::Bool(true)
        );
    }

    // Property target (spec §8.3): for all integer n, m with m != 0,
    // (n*m) % m == 0.
    #[test]
    fn modulo_by_a_factor_is_always_zero() {
        let p = StaticPrincipal::new("u");
        for n in [-7, -1, 0, 1, 3, 11] {
            for m in [-5, -1, 1, 2, 9] {
                let e = env(&p);
                let node = Node::Comparison(
                    ComparisonOp::Eq,
                    Box::new(Node::Math(
                        MathOp::Mod,
                        Box::new(Node::Constant(Value::Number(Number::Int(n * m)))),
                        Box::new(Node::Constant(Value::Number(Number::Int(m)))),
                    )),
                    Box::new(Node::Constant(Value::Number(Number::Int(0)))),
                );
                assert_eq!(node.evaluate(&e).unwrap(), Value::Bool(true), "n={n} m={m}");
            }
        }
    }

    // Property target (spec §8.3): for all strings s, ($x == 'x') == (s == "x").
    #[test]
    fn string_equality_matches_host_string_equality() {
        let p = StaticPrincipal::new("u");
        for s in ["x", "", "xx", "y", "X"] {
            let e = env(&p);
            let node = Node::Comparison(
                ComparisonOp::Eq,
                Box::new(Node::Constant(Value::String(s.to_string()))),
                Box::new(Node::Constant(Value::String("x".to_string()))),
            );
            assert_eq!(
                node.evaluate(&e).unwrap(),
                Value::Bool(s == "x"),
                "s={s:?}"
            );
        }
    }

    // Invariant (spec §8): eval(allow: E) + eval(deny: E) are complementary
    // for a boolean-valued E, checked directly at the node level (the guard
    // level equivalent lives in guard.rs).
    #[test]
    fn numeric_equality_treats_int_and_float_as_equal() {
        let p = StaticPrincipal::new("u");
        let e = env(&p);
        let node = Node::Comparison(
            ComparisonOp::Eq,
            Box::new(Node::Constant(Value::Number(Number::Int(3)))),
            Box::new(Node::Constant(Value::Number(Number::Float(3.0)))),
        );
        assert_eq!(node.evaluate(&e).unwrap(), Value::Bool(true));
    }
}
