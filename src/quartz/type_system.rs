use crate::quartz::symbol_table::Type;

// Static table of per-operator type-compatibility and conversion rules.
// Every valid combination is an explicit entry; there is no transitive
// coercion search, so (integer, real) and (real, integer) are both listed
// wherever a commutative result is wanted.
pub struct TypeSystem;

impl TypeSystem {
    // Determines the result type of applying an operator to the given
    // operand types, or None when the operation is not allowed. Unary
    // operators pass None for the right type.
    pub fn result_type(operator: &str, left: Type, right: Option<Type>) -> Option<Type> {
        // A sentinel on either side poisons the result
        if left == Type::Error || right == Some(Type::Error) {
            return None;
        }

        // For assignment the result is the type of the left-hand side
        if operator == ":=" {
            return Some(left);
        }

        // The only unary operator
        if operator == "not" {
            if left == Type::Boolean && right.is_none() {
                return Some(Type::Boolean);
            }
            return None;
        }

        let right: Type = right?;

        return match operator {
            "+" => match (left, right) {
                (Type::Integer, Type::Integer) => Some(Type::Integer),
                (Type::Real, Type::Real) => Some(Type::Real),
                (Type::Integer, Type::Real) => Some(Type::Real),
                (Type::Real, Type::Integer) => Some(Type::Real),
                (Type::String, Type::String) => Some(Type::String),
                _ => None
            },
            "-" | "*" => match (left, right) {
                (Type::Integer, Type::Integer) => Some(Type::Integer),
                (Type::Real, Type::Real) => Some(Type::Real),
                (Type::Integer, Type::Real) => Some(Type::Real),
                (Type::Real, Type::Integer) => Some(Type::Real),
                _ => None
            },
            // Division always produces a real, even over two integers
            "/" => match (left, right) {
                (Type::Integer, Type::Integer) => Some(Type::Real),
                (Type::Real, Type::Real) => Some(Type::Real),
                (Type::Integer, Type::Real) => Some(Type::Real),
                (Type::Real, Type::Integer) => Some(Type::Real),
                _ => None
            },
            // Equality is defined for every type when both sides agree,
            // plus the mixed numeric pairs
            "=" | "<>" => match (left, right) {
                (Type::Integer, Type::Integer) => Some(Type::Boolean),
                (Type::Real, Type::Real) => Some(Type::Boolean),
                (Type::Integer, Type::Real) => Some(Type::Boolean),
                (Type::Real, Type::Integer) => Some(Type::Boolean),
                (Type::Boolean, Type::Boolean) => Some(Type::Boolean),
                (Type::String, Type::String) => Some(Type::Boolean),
                (Type::Char, Type::Char) => Some(Type::Boolean),
                _ => None
            },
            // Ordering comparisons only exist for numerics
            "<" | ">" | "<=" | ">=" => match (left, right) {
                (Type::Integer, Type::Integer) => Some(Type::Boolean),
                (Type::Real, Type::Real) => Some(Type::Boolean),
                (Type::Integer, Type::Real) => Some(Type::Boolean),
                (Type::Real, Type::Integer) => Some(Type::Boolean),
                _ => None
            },
            "and" | "or" => match (left, right) {
                (Type::Boolean, Type::Boolean) => Some(Type::Boolean),
                _ => None
            },
            _ => None
        };
    }

    // Whether a value of one type may be implicitly converted to another.
    // Identity is always allowed; the only widening conversions are
    // integer to real and char to string. Nothing narrows.
    pub fn can_convert(from: Type, to: Type) -> bool {
        if from == to {
            return true;
        }

        return match (from, to) {
            (Type::Integer, Type::Real) => true,
            (Type::Char, Type::String) => true,
            _ => false
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_division_widens_to_real() {
        assert_eq!(TypeSystem::result_type("/", Type::Integer, Some(Type::Integer)), Some(Type::Real));
    }

    #[test]
    fn mixed_numeric_arithmetic_is_real() {
        assert_eq!(TypeSystem::result_type("+", Type::Integer, Some(Type::Real)), Some(Type::Real));
        assert_eq!(TypeSystem::result_type("*", Type::Real, Some(Type::Integer)), Some(Type::Real));
    }

    #[test]
    fn string_concatenation_is_the_only_string_arithmetic() {
        assert_eq!(TypeSystem::result_type("+", Type::String, Some(Type::String)), Some(Type::String));
        assert_eq!(TypeSystem::result_type("-", Type::String, Some(Type::String)), None);
    }

    #[test]
    fn comparisons_yield_boolean() {
        assert_eq!(TypeSystem::result_type("<=", Type::Integer, Some(Type::Real)), Some(Type::Boolean));
        assert_eq!(TypeSystem::result_type("=", Type::Char, Some(Type::Char)), Some(Type::Boolean));
        assert_eq!(TypeSystem::result_type("<", Type::String, Some(Type::String)), None);
    }

    #[test]
    fn logic_requires_booleans() {
        assert_eq!(TypeSystem::result_type("and", Type::Boolean, Some(Type::Boolean)), Some(Type::Boolean));
        assert_eq!(TypeSystem::result_type("or", Type::Boolean, Some(Type::Integer)), None);
        assert_eq!(TypeSystem::result_type("not", Type::Boolean, None), Some(Type::Boolean));
        assert_eq!(TypeSystem::result_type("not", Type::Integer, None), None);
    }

    #[test]
    fn sentinel_types_never_produce_a_result() {
        assert_eq!(TypeSystem::result_type("+", Type::Error, Some(Type::Integer)), None);
        assert_eq!(TypeSystem::result_type("+", Type::Integer, Some(Type::Error)), None);
    }

    #[test]
    fn conversions_are_one_directional() {
        assert!(TypeSystem::can_convert(Type::Integer, Type::Real));
        assert!(!TypeSystem::can_convert(Type::Real, Type::Integer));
        assert!(TypeSystem::can_convert(Type::Char, Type::String));
        assert!(!TypeSystem::can_convert(Type::String, Type::Char));
        assert!(TypeSystem::can_convert(Type::Boolean, Type::Boolean));
    }
}
