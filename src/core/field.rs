// target field checks on the container type
use crate::core::conform::conforms_erased;
use crate::core::env::TypeEnvironment;
use crate::core::state::{FailureKind, Issue};
use crate::core::types::{MemberKind, TypeInfo, erase};

/// Result of validating the target field of one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCheck {
    pub issues: Vec<Issue>,
    /// How many same-named fields the container declares.
    pub matches: usize,
}

impl FieldCheck {
    pub fn has_hard_failure(&self) -> bool {
        self.issues.iter().any(Issue::is_hard)
    }
}

/// Validates `field` on an already resolved `container`.
///
/// Every same-named field is checked and every check runs, so one pass reports
/// all the problems at once:
/// 1. no such field -> MissingField
/// 2. not public -> FieldNotVisible
/// 3. not static (when `require_static`) -> FieldNotStatic
/// 4. not final -> FieldNotFinal, a warning only
/// 5. erased type neither equal nor directly assignable to `required` -> FieldWrongType
pub fn validate_field<E>(
    env: &E,
    candidate: &str,
    container: &TypeInfo,
    field: &str,
    required: &str,
    require_static: bool,
) -> FieldCheck
where
    E: TypeEnvironment + ?Sized,
{
    let fields: Vec<_> = env
        .declared_members(container)
        .into_iter()
        .filter(|m| m.kind == MemberKind::Field && m.name == field)
        .collect();

    let mut check = FieldCheck { issues: Vec::new(), matches: fields.len() };

    if fields.is_empty() {
        check.issues.push(Issue::new(
            FailureKind::MissingField,
            candidate,
            format!("field {field} does not exist in {}", container.name),
        ));
        return check;
    }

    for m in &fields {
        if !m.is_public() {
            check.issues.push(Issue::new(
                FailureKind::FieldNotVisible,
                candidate,
                format!("field {field} in {} is not public", container.name),
            ));
        }

        if require_static && !m.is_static {
            check.issues.push(Issue::new(
                FailureKind::FieldNotStatic,
                candidate,
                format!("field {field} in {} is not static", container.name),
            ));
        }

        if !m.is_final {
            check.issues.push(Issue::new(
                FailureKind::FieldNotFinal,
                candidate,
                format!("field {field} in {} is not final", container.name),
            ));
        }

        if !conforms_erased(env, &m.ty, required) {
            check.issues.push(Issue::new(
                FailureKind::FieldWrongType,
                candidate,
                format!(
                    "field {field} in {} is of type {}, not {}",
                    container.name,
                    erase(&m.ty),
                    erase(required)
                ),
            ));
        }
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env::StaticEnvironment;
    use crate::core::types::{DeclKind, MemberDecl, Visibility};

    fn mk_env() -> StaticEnvironment {
        StaticEnvironment::new()
            .with_type(TypeInfo::new("a.Color", DeclKind::Interface))
            .with_type(TypeInfo::new("a.Warm", DeclKind::Interface).with_supertype("a.Color"))
            .with_type(TypeInfo::new("a.Shape", DeclKind::Interface))
    }

    fn kinds(check: &FieldCheck) -> Vec<FailureKind> {
        check.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn valid_field_has_no_issues() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class)
            .with_member(MemberDecl::field("RED", "a.Color"));

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", true);
        assert_eq!(check.matches, 1);
        assert!(check.issues.is_empty());
    }

    #[test]
    fn missing_field_is_reported() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class)
            .with_member(MemberDecl::field("BLUE", "a.Color"));

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", true);
        assert_eq!(check.matches, 0);
        assert_eq!(kinds(&check), vec![FailureKind::MissingField]);
        assert!(check.has_hard_failure());
    }

    #[test]
    fn methods_with_the_field_name_are_ignored() {
        let env = mk_env();
        let mut method = MemberDecl::field("RED", "a.Color");
        method.kind = MemberKind::Method;
        let colors = TypeInfo::new("a.Colors", DeclKind::Class).with_member(method);

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", true);
        assert_eq!(kinds(&check), vec![FailureKind::MissingField]);
    }

    #[test]
    fn non_final_field_only_warns() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class)
            .with_member(MemberDecl::field("RED", "a.Color").with_final(false));

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", true);
        assert_eq!(kinds(&check), vec![FailureKind::FieldNotFinal]);
        assert!(!check.has_hard_failure());
    }

    #[test]
    fn every_problem_is_reported_without_short_circuit() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class).with_member(
            MemberDecl::field("RED", "a.Shape")
                .with_visibility(Visibility::Private)
                .with_static(false)
                .with_final(false),
        );

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", true);
        assert_eq!(
            kinds(&check),
            vec![
                FailureKind::FieldNotVisible,
                FailureKind::FieldNotStatic,
                FailureKind::FieldNotFinal,
                FailureKind::FieldWrongType,
            ]
        );
    }

    #[test]
    fn static_requirement_can_be_lifted() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class)
            .with_member(MemberDecl::field("RED", "a.Color").with_static(false));

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", false);
        assert!(check.issues.is_empty());
    }

    #[test]
    fn all_same_named_fields_are_checked() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class)
            .with_member(MemberDecl::field("RED", "a.Color"))
            .with_member(MemberDecl::field("RED", "a.Color").with_visibility(Visibility::Protected));

        let check = validate_field(&env, "a.Red", &colors, "RED", "a.Color", true);
        assert_eq!(check.matches, 2);
        assert_eq!(kinds(&check), vec![FailureKind::FieldNotVisible]);
    }

    #[test]
    fn field_type_may_be_generic_or_a_direct_subtype() {
        let env = mk_env();
        let colors = TypeInfo::new("a.Colors", DeclKind::Class)
            .with_member(MemberDecl::field("RED", "a.Color<a.Rgb>"))
            .with_member(MemberDecl::field("WARM", "a.Warm"));

        assert!(validate_field(&env, "a.Red", &colors, "RED", "a.Color", true).issues.is_empty());
        assert!(validate_field(&env, "a.Sun", &colors, "WARM", "a.Color", true).issues.is_empty());
    }
}
