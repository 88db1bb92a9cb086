// declaration and type records handed over by the host environment
use serde::{Deserialize, Serialize};

/// Fully qualified type or declaration identity, e.g. `org.example.Color<T>`.
pub type TypeName = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    Method,
    Field,
    Constructor,
    Other,
}

impl DeclKind {
    //only type declarations may carry the catalog tag
    pub fn is_type_like(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Interface | DeclKind::Enum)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

/// The three parameters of the catalog tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogTag {
    pub catalog_type_class: TypeName,
    pub container_class: TypeName,
    pub field: String,
}

impl CatalogTag {
    pub fn new(
        catalog_type_class: impl Into<TypeName>,
        container_class: impl Into<TypeName>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            catalog_type_class: catalog_type_class.into(),
            container_class: container_class.into(),
            field: field.into(),
        }
    }
}

/// A tagged declaration found by the host in the current round.
///
/// `identity` is what ends up as the assigned value in the mapping tree;
/// `declared_type` is the type the declaration introduces (possibly generic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDeclaration {
    pub identity: String,
    pub kind: DeclKind,
    pub declared_type: TypeName,
    pub tag: CatalogTag,
}

impl CandidateDeclaration {
    //convenience for the common case: a class whose identity is its type
    pub fn class(identity: impl Into<String>, tag: CatalogTag) -> Self {
        let identity = identity.into();
        Self {
            declared_type: identity.clone(),
            identity,
            kind: DeclKind::Class,
            tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_final: bool,
    pub ty: TypeName,
}

impl MemberDecl {
    pub fn field(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            is_static: true,
            is_final: true,
            ty: ty.into(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A type the environment was able to resolve.
///
/// `supertypes` lists direct supertypes only (superclass and directly
/// implemented interfaces); nothing here is transitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: TypeName,
    pub kind: DeclKind,
    #[serde(default)]
    pub supertypes: Vec<TypeName>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

impl TypeInfo {
    pub fn new(name: impl Into<TypeName>, kind: DeclKind) -> Self {
        Self { name: name.into(), kind, supertypes: Vec::new(), members: Vec::new() }
    }

    pub fn with_supertype(mut self, supertype: impl Into<TypeName>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }
}

/// Erased form of a type identity: the generic argument list is dropped.
pub fn erase(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => name[..idx].trim_end(),
        None => name.trim_end(),
    }
}
