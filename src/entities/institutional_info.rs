use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film_institutional_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub info_id: i32,
    pub film_id: i32,
    pub production_company: Option<String>,
    pub funding_company: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub funding_comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub source: Option<String>,
    pub funding_location_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::film::Entity",
        from = "Column::FilmId",
        to = "super::film::Column::FilmId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Film,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::FundingLocationId",
        to = "super::location::Column::LocationId",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    FundingLocation,
}

impl Related<super::film::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Film.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundingLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
