use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Age groups in the order the federation lists them. The declaration order
/// is the canonical display order used by the slicers.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    Deserialize,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "age_group")]
pub enum AgeGroup {
    #[sea_orm(string_value = "oldies")]
    Oldies,
    #[sea_orm(string_value = "senior")]
    Senior,
    #[sea_orm(string_value = "u21")]
    U21,
    #[sea_orm(string_value = "u19")]
    U19,
    #[sea_orm(string_value = "u17")]
    U17,
    #[sea_orm(string_value = "u15")]
    U15,
    #[sea_orm(string_value = "u13")]
    U13,
    #[sea_orm(string_value = "u12")]
    U12,
    #[sea_orm(string_value = "u11")]
    U11,
    #[sea_orm(string_value = "u10")]
    U10,
    #[sea_orm(string_value = "u9")]
    U9,
    #[sea_orm(string_value = "u8")]
    U8,
    #[sea_orm(string_value = "u7")]
    U7,
    #[sea_orm(string_value = "u5")]
    U5,
}

impl AgeGroup {
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Oldies => "Oldies",
            AgeGroup::Senior => "Senior",
            AgeGroup::U21 => "U-21",
            AgeGroup::U19 => "U-19",
            AgeGroup::U17 => "U-17",
            AgeGroup::U15 => "U-15",
            AgeGroup::U13 => "U-13",
            AgeGroup::U12 => "U-12",
            AgeGroup::U11 => "U-11",
            AgeGroup::U10 => "U-10",
            AgeGroup::U9 => "U-9",
            AgeGroup::U8 => "U-8",
            AgeGroup::U7 => "U-7",
            AgeGroup::U5 => "U-5",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.to_value())
    }
}

impl std::str::FromStr for AgeGroup {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('-', "");
        AgeGroup::iter()
            .find(|group| group.to_value() == normalized)
            .ok_or(())
    }
}
