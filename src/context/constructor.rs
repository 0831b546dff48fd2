use crate::core::ConstructorDescriptor;

/// Picks the constructor used to materialize an entity.
///
/// An explicitly preferred constructor wins (the first one if several are
/// marked), then a sole constructor, then a no-arg constructor. Anything
/// else is ambiguous and yields `None`.
pub fn discover_preferred_constructor(
    constructors: &[ConstructorDescriptor],
) -> Option<&ConstructorDescriptor> {
    if let Some(explicit) = constructors.iter().find(|c| c.preferred) {
        return Some(explicit);
    }
    if let [only] = constructors {
        return Some(only);
    }
    constructors.iter().find(|c| c.is_no_arg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeclaredType, ParameterDescriptor};

    fn ctor(arity: usize) -> ConstructorDescriptor {
        let params = (0..arity)
            .map(|i| ParameterDescriptor::new(i, Some(format!("p{i}")), DeclaredType::scalar("Long")))
            .collect();
        ConstructorDescriptor::new(params)
    }

    #[test]
    fn test_no_constructors() {
        assert!(discover_preferred_constructor(&[]).is_none());
    }

    #[test]
    fn test_single_constructor() {
        let ctors = [ctor(2)];
        assert_eq!(discover_preferred_constructor(&ctors).unwrap().parameters.len(), 2);
    }

    #[test]
    fn test_explicit_preference_wins() {
        let ctors = [ctor(0), ctor(1), ctor(3).preferred(), ctor(2).preferred()];
        assert_eq!(discover_preferred_constructor(&ctors).unwrap().parameters.len(), 3);
    }

    #[test]
    fn test_falls_back_to_no_arg() {
        let ctors = [ctor(2), ctor(0), ctor(1)];
        assert!(discover_preferred_constructor(&ctors).unwrap().is_no_arg());
    }

    #[test]
    fn test_ambiguous_constructors() {
        let ctors = [ctor(1), ctor(2)];
        assert!(discover_preferred_constructor(&ctors).is_none());
    }
}
