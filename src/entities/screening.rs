use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One exhibition of a film. `screening_date` holds an ISO-8601 calendar date.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film_screenings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub screening_id: i32,
    pub film_id: i32,
    pub screening_date: Option<String>,
    pub location_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub organizers: Option<String>,
    pub format: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub audience: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub film_rights: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub source: Option<String>,
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
        from = "Column::LocationId",
        to = "super::location::Column::LocationId",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Location,
}

impl Related<super::film::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Film.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
