use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Production timeframe and place for a film. The post-production studio is a
/// free-text label, not a reference into `locations`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film_production_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub production_detail_id: i32,
    pub film_id: i32,
    pub production_timeframe: Option<String>,
    pub shooting_location_id: Option<i32>,
    pub post_production_studio: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub production_comments: Option<String>,
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
        from = "Column::ShootingLocationId",
        to = "super::location::Column::LocationId",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    ShootingLocation,
}

impl Related<super::film::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Film.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShootingLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
