// shallow type conformance: identity or one step up the supertype graph
use crate::core::env::TypeEnvironment;
use crate::core::types::erase;

/// `declared` conforms to `required` when the two are the same identity or
/// `required` is one of `declared`'s *direct* supertypes. A raw `required`
/// (no type arguments) also matches a parameterized supertype of the same name.
///
/// Grandparents do not count. Callers that need more must hand in a type whose
/// direct supertypes already contain what they are looking for. An unresolvable
/// `declared` can only conform by identity.
pub fn conforms<E>(env: &E, declared: &str, required: &str) -> bool
where
    E: TypeEnvironment + ?Sized,
{
    if declared == required {
        return true;
    }

    let Some(ty) = env.resolve_type(declared) else {
        return false;
    };

    //a raw required type is met by any parameterization of it
    let raw = !required.contains('<');
    env.direct_supertypes(&ty)
        .iter()
        .any(|s| s == required || (raw && erase(s) == required))
}

/// Same check as [`conforms`], done on erased identities on every side.
pub fn conforms_erased<E>(env: &E, declared: &str, required: &str) -> bool
where
    E: TypeEnvironment + ?Sized,
{
    let declared = erase(declared);
    let required = erase(required);
    if declared == required {
        return true;
    }

    let Some(ty) = env.resolve_type(declared) else {
        return false;
    };

    env.direct_supertypes(&ty).iter().any(|s| erase(s) == required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env::StaticEnvironment;
    use crate::core::types::{DeclKind, TypeInfo};

    //A extends B extends C
    fn three_level() -> StaticEnvironment {
        StaticEnvironment::new()
            .with_type(TypeInfo::new("x.C", DeclKind::Interface))
            .with_type(TypeInfo::new("x.B", DeclKind::Interface).with_supertype("x.C"))
            .with_type(TypeInfo::new("x.A", DeclKind::Class).with_supertype("x.B"))
    }

    #[test]
    fn conforms_is_reflexive() {
        let env = three_level();
        assert!(conforms(&env, "x.A", "x.A"));
        assert!(conforms(&env, "x.C", "x.C"));
        //identity holds even for types the environment does not know
        assert!(conforms(&env, "x.Unknown", "x.Unknown"));
    }

    #[test]
    fn conforms_only_looks_one_level_up() {
        let env = three_level();
        assert!(conforms(&env, "x.A", "x.B"));
        assert!(conforms(&env, "x.B", "x.C"));
        assert!(!conforms(&env, "x.A", "x.C"));
        assert!(!conforms(&env, "x.B", "x.A"));
    }

    #[test]
    fn unresolved_declared_type_does_not_conform() {
        let env = three_level();
        assert!(!conforms(&env, "x.Unknown", "x.B"));
    }

    #[test]
    fn erased_conformance_ignores_generic_arguments() {
        let env = StaticEnvironment::new()
            .with_type(TypeInfo::new("x.Registry", DeclKind::Interface))
            .with_type(TypeInfo::new("x.Impl", DeclKind::Class).with_supertype("x.Registry<x.Impl>"));

        assert!(conforms_erased(&env, "x.Impl", "x.Registry"));
        assert!(conforms_erased(&env, "x.Registry<T>", "x.Registry"));
    }

    #[test]
    fn raw_required_type_accepts_a_parameterized_supertype() {
        let env = StaticEnvironment::new()
            .with_type(TypeInfo::new("x.Registry", DeclKind::Interface))
            .with_type(TypeInfo::new("x.Impl", DeclKind::Class).with_supertype("x.Registry<x.Impl>"));

        assert!(conforms(&env, "x.Impl", "x.Registry"));
        assert!(conforms(&env, "x.Impl", "x.Registry<x.Impl>"));
        //a parameterized requirement is not met by a different parameterization
        assert!(!conforms(&env, "x.Impl", "x.Registry<x.Other>"));
        assert!(!conforms(&env, "x.Impl", "x.Registr"));
    }
}
