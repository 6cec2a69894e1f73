use std::fmt;
use std::io::Write;
use std::str::FromStr;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Varchar;
use serde::{Deserialize, Serialize};

/// Width of the `foodlog.quantity` column.
pub(crate) const QUANTITY_MAX_LEN: usize = 50;

/// Unit of measure a food log amount is expressed in.
///
/// Stored in `foodlog.quantity` as its token. The set of tokens is pinned by the
/// `foodlog_quantity_check` constraint added in revision 0008, so adding a variant
/// here means adding a migration too.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[serde(try_from = "String", into = "&'static str")]
#[sql_type = "Varchar"]
pub(crate) enum Quantity {
    Cup,
    Ounce,
    Gram,
    Tablespoon,
    Teaspoon,
    Milliliter,
    Liter,
    Slice,
    Piece,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum QuantityError {
    #[error("unknown quantity unit `{0}`")]
    Unknown(String),
    #[error("quantity unit is {0} characters long, at most {max} are allowed", max = QUANTITY_MAX_LEN)]
    TooLong(usize),
}

impl Quantity {
    pub(crate) const ALL: [Quantity; 9] = [
        Quantity::Cup,
        Quantity::Ounce,
        Quantity::Gram,
        Quantity::Tablespoon,
        Quantity::Teaspoon,
        Quantity::Milliliter,
        Quantity::Liter,
        Quantity::Slice,
        Quantity::Piece,
    ];

    pub(crate) fn token(self) -> &'static str {
        match self {
            Quantity::Cup => "cup",
            Quantity::Ounce => "oz",
            Quantity::Gram => "g",
            Quantity::Tablespoon => "tbsp",
            Quantity::Teaspoon => "tsp",
            Quantity::Milliliter => "ml",
            Quantity::Liter => "l",
            Quantity::Slice => "slice",
            Quantity::Piece => "piece",
        }
    }

    /// Human readable label, for display only. Never stored.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Quantity::Cup => "Cup(s)",
            Quantity::Ounce => "Ounce(s)",
            Quantity::Gram => "Gram(s)",
            Quantity::Tablespoon => "Tablespoon(s)",
            Quantity::Teaspoon => "Teaspoon(s)",
            Quantity::Milliliter => "Milliliter(s)",
            Quantity::Liter => "Liter(s)",
            Quantity::Slice => "Slice(s)",
            Quantity::Piece => "Piece(s)",
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len > QUANTITY_MAX_LEN {
            return Err(QuantityError::TooLong(len));
        }
        Quantity::ALL
            .iter()
            .copied()
            .find(|unit| unit.token() == s)
            .ok_or_else(|| QuantityError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for &'static str {
    fn from(unit: Quantity) -> Self {
        unit.token()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl<DB> ToSql<Varchar, DB> for Quantity
where
    DB: Backend,
    str: ToSql<Varchar, DB>,
{
    fn to_sql<W: Write>(&self, out: &mut Output<W, DB>) -> serialize::Result {
        <str as ToSql<Varchar, DB>>::to_sql(self.token(), out)
    }
}

// Rows written before 0008 may still hold free-form values; those surface as a
// deserialization error instead of being mapped onto a unit.
impl<DB> FromSql<Varchar, DB> for Quantity
where
    DB: Backend,
    String: FromSql<Varchar, DB>,
{
    fn from_sql(bytes: Option<&DB::RawValue>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Varchar, DB>>::from_sql(bytes)?;
        Ok(raw.parse()?)
    }
}

/// Entry of the `/apis/units` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UnitOption {
    pub token: String,
    pub label: String,
}

impl From<Quantity> for UnitOption {
    fn from(unit: Quantity) -> Self {
        UnitOption {
            token: unit.token().to_string(),
            label: unit.label().to_string(),
        }
    }
}

pub(crate) fn unit_options() -> Vec<UnitOption> {
    Quantity::ALL.iter().copied().map(UnitOption::from).collect()
}
