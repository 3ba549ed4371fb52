//! Field dictionary: portal labels to canonical field names.

use std::fmt;

use serde::Serialize;

/// The closed set of fields an affiliation record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    TypeIdentity,
    Identity,
    Names,
    LastNames,
    Birthday,
    Province,
    Municipality,
    Status,
    Entity,
    Regime,
    EffectiveDateMembership,
    EndDateMembership,
    TypeMember,
}

impl CanonicalField {
    /// All fields, in output order.
    pub const ALL: [CanonicalField; 13] = [
        CanonicalField::TypeIdentity,
        CanonicalField::Identity,
        CanonicalField::Names,
        CanonicalField::LastNames,
        CanonicalField::Birthday,
        CanonicalField::Province,
        CanonicalField::Municipality,
        CanonicalField::Status,
        CanonicalField::Entity,
        CanonicalField::Regime,
        CanonicalField::EffectiveDateMembership,
        CanonicalField::EndDateMembership,
        CanonicalField::TypeMember,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::TypeIdentity => "type_identity",
            CanonicalField::Identity => "identity",
            CanonicalField::Names => "names",
            CanonicalField::LastNames => "last_names",
            CanonicalField::Birthday => "birthday",
            CanonicalField::Province => "province",
            CanonicalField::Municipality => "municipality",
            CanonicalField::Status => "status",
            CanonicalField::Entity => "entity",
            CanonicalField::Regime => "regime",
            CanonicalField::EffectiveDateMembership => "effective_date_membership",
            CanonicalField::EndDateMembership => "end_date_membership",
            CanonicalField::TypeMember => "type_member",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portal label text, exactly as the portal writes it (accents included),
/// mapped to its canonical field.
pub const FIELD_DICTIONARY: &[(&str, CanonicalField)] = &[
    // Basic information table (vertical)
    ("TIPO DE IDENTIFICACIÓN", CanonicalField::TypeIdentity),
    ("NÚMERO DE IDENTIFICACION", CanonicalField::Identity),
    ("NOMBRES", CanonicalField::Names),
    ("APELLIDOS", CanonicalField::LastNames),
    ("FECHA DE NACIMIENTO", CanonicalField::Birthday),
    ("DEPARTAMENTO", CanonicalField::Province),
    ("MUNICIPIO", CanonicalField::Municipality),
    // Affiliation table (horizontal)
    ("ESTADO", CanonicalField::Status),
    ("ENTIDAD", CanonicalField::Entity),
    ("REGIMEN", CanonicalField::Regime),
    ("FECHA DE AFILIACIÓN EFECTIVA", CanonicalField::EffectiveDateMembership),
    ("FECHA DE FINALIZACIÓN DE AFILIACIÓN", CanonicalField::EndDateMembership),
    ("TIPO DE AFILIADO", CanonicalField::TypeMember),
];

/// Exact, case- and accent-sensitive lookup of an already cleaned label.
pub fn lookup_label(label: &str) -> Option<CanonicalField> {
    FIELD_DICTIONARY
        .iter()
        .find(|(text, _)| *text == label)
        .map(|(_, field)| *field)
}
