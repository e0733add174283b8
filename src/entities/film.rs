use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub film_id: i32,
    pub title: String,
    pub release_year: Option<i32>,
    /// Minutes.
    pub runtime: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub synopsis: Option<String>,
    pub av_annotate_link: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::production_detail::Entity")]
    ProductionDetails,
    #[sea_orm(has_many = "super::author::Entity")]
    Authors,
    #[sea_orm(has_many = "super::production_team_member::Entity")]
    ProductionTeam,
    #[sea_orm(has_many = "super::actor::Entity")]
    Actors,
    #[sea_orm(has_many = "super::equipment::Entity")]
    Equipment,
    #[sea_orm(has_many = "super::document::Entity")]
    Documents,
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

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authors.def()
    }
}

impl Related<super::production_team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionTeam.def()
    }
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actors.def()
    }
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
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

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = super::now_sec();

        if insert {
            // Imports carry their original timestamps.
            if self.created_at.is_not_set() {
                self.created_at = Set(now);
            }
            if self.updated_at.is_not_set() {
                self.updated_at = Set(now);
            }
        } else {
            self.updated_at = Set(now);
        }

        Ok(self)
    }
}
