use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub location_id: i32,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::production_detail::Entity")]
    ProductionDetails,
    #[sea_orm(has_many = "super::institutional_info::Entity")]
    InstitutionalInfo,
    #[sea_orm(has_many = "super::screening::Entity")]
    Screenings,
}

impl Related<super::production_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionDetails.def()
    }
}

impl Related<super::institutional_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstitutionalInfo.def()
    }
}

impl Related<super::screening::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screenings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
