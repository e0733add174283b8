use jiff::civil::Date;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        actor, author, document, equipment, film, institutional_info, location, production_detail,
        production_team_member, screening, user,
    },
    error::{AppError, AppResult},
};

pub const DEFAULT_ROLE: &str = "user";

fn require(field: &'static str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(field, "must not be blank"));
    }
    Ok(())
}

/// Input for a row that hangs off a film.
pub trait FilmScoped {
    /// Rejects blank required text.
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }

    /// The location this row points at, if any.
    fn location_ref(&self) -> Option<i32> {
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmInput {
    pub title: String,
    pub release_year: Option<i32>,
    pub runtime: Option<i32>,
    pub synopsis: Option<String>,
    pub av_annotate_link: Option<String>,
}

impl FilmInput {
    pub(crate) fn validate(&self) -> AppResult<()> {
        require("title", &self.title)?;
        if self.runtime.is_some_and(|r| r < 0) {
            return Err(AppError::invalid("runtime", "must not be negative"));
        }
        Ok(())
    }

    pub(crate) fn write_to(self, am: &mut film::ActiveModel) {
        am.title = Set(self.title);
        am.release_year = Set(self.release_year);
        am.runtime = Set(self.runtime);
        am.synopsis = Set(self.synopsis);
        am.av_annotate_link = Set(self.av_annotate_link);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub comment: Option<String>,
}

impl LocationInput {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
            return Err(AppError::invalid("latitude", "must be within [-90, 90]"));
        }
        if self.longitude.is_some_and(|lon| !(-180.0..=180.0).contains(&lon)) {
            return Err(AppError::invalid("longitude", "must be within [-180, 180]"));
        }
        Ok(())
    }

    pub(crate) fn write_to(self, am: &mut location::ActiveModel) {
        am.name = Set(self.name);
        am.address = Set(self.address);
        am.city = Set(self.city);
        am.state = Set(self.state);
        am.country = Set(self.country);
        am.latitude = Set(self.latitude);
        am.longitude = Set(self.longitude);
        am.comment = Set(self.comment);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionDetailInput {
    pub production_timeframe: Option<String>,
    pub shooting_location_id: Option<i32>,
    /// Free text; never resolved against `locations`.
    pub post_production_studio: Option<String>,
    pub production_comments: Option<String>,
}

impl FilmScoped for ProductionDetailInput {
    fn location_ref(&self) -> Option<i32> {
        self.shooting_location_id
    }
}

impl ProductionDetailInput {
    pub(crate) fn write_to(self, am: &mut production_detail::ActiveModel) {
        am.production_timeframe = Set(self.production_timeframe);
        am.shooting_location_id = Set(self.shooting_location_id);
        am.post_production_studio = Set(self.post_production_studio);
        am.production_comments = Set(self.production_comments);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInput {
    pub role: Option<String>,
    pub name: String,
    pub comment: Option<String>,
}

impl FilmScoped for AuthorInput {
    fn validate(&self) -> AppResult<()> {
        require("author name", &self.name)
    }
}

impl AuthorInput {
    pub(crate) fn write_to(self, am: &mut author::ActiveModel) {
        am.role = Set(self.role);
        am.name = Set(self.name);
        am.comment = Set(self.comment);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberInput {
    pub department: Option<String>,
    pub name: String,
    pub role: Option<String>,
    pub comment: Option<String>,
}

impl FilmScoped for TeamMemberInput {
    fn validate(&self) -> AppResult<()> {
        require("team member name", &self.name)
    }
}

impl TeamMemberInput {
    pub(crate) fn write_to(self, am: &mut production_team_member::ActiveModel) {
        am.department = Set(self.department);
        am.name = Set(self.name);
        am.role = Set(self.role);
        am.comment = Set(self.comment);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInput {
    pub actor_name: String,
    pub character_name: Option<String>,
    pub comment: Option<String>,
}

impl FilmScoped for ActorInput {
    fn validate(&self) -> AppResult<()> {
        require("actor name", &self.actor_name)
    }
}

impl ActorInput {
    pub(crate) fn write_to(self, am: &mut actor::ActiveModel) {
        am.actor_name = Set(self.actor_name);
        am.character_name = Set(self.character_name);
        am.comment = Set(self.comment);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentInput {
    pub equipment_name: String,
    pub description: Option<String>,
    pub comment: Option<String>,
}

impl FilmScoped for EquipmentInput {
    fn validate(&self) -> AppResult<()> {
        require("equipment name", &self.equipment_name)
    }
}

impl EquipmentInput {
    pub(crate) fn write_to(self, am: &mut equipment::ActiveModel) {
        am.equipment_name = Set(self.equipment_name);
        am.description = Set(self.description);
        am.comment = Set(self.comment);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub document_type: Option<String>,
    pub file_url: Option<String>,
    pub comment: Option<String>,
}

impl FilmScoped for DocumentInput {}

impl DocumentInput {
    pub(crate) fn write_to(self, am: &mut document::ActiveModel) {
        am.document_type = Set(self.document_type);
        am.file_url = Set(self.file_url);
        am.comment = Set(self.comment);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionalInfoInput {
    pub production_company: Option<String>,
    pub funding_company: Option<String>,
    pub funding_comment: Option<String>,
    pub source: Option<String>,
    pub funding_location_id: Option<i32>,
}

impl FilmScoped for InstitutionalInfoInput {
    fn location_ref(&self) -> Option<i32> {
        self.funding_location_id
    }
}

impl InstitutionalInfoInput {
    pub(crate) fn write_to(self, am: &mut institutional_info::ActiveModel) {
        am.production_company = Set(self.production_company);
        am.funding_company = Set(self.funding_company);
        am.funding_comment = Set(self.funding_comment);
        am.source = Set(self.source);
        am.funding_location_id = Set(self.funding_location_id);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningInput {
    pub screening_date: Option<Date>,
    pub location_id: Option<i32>,
    pub organizers: Option<String>,
    /// Open text, e.g. the print gauge.
    pub format: Option<String>,
    pub audience: Option<String>,
    pub film_rights: Option<String>,
    pub comment: Option<String>,
    pub source: Option<String>,
}

impl FilmScoped for ScreeningInput {
    fn location_ref(&self) -> Option<i32> {
        self.location_id
    }
}

impl ScreeningInput {
    pub(crate) fn write_to(self, am: &mut screening::ActiveModel) {
        am.screening_date = Set(self.screening_date.map(|d| d.to_string()));
        am.location_id = Set(self.location_id);
        am.organizers = Set(self.organizers);
        am.format = Set(self.format);
        am.audience = Set(self.audience);
        am.film_rights = Set(self.film_rights);
        am.comment = Set(self.comment);
        am.source = Set(self.source);
    }
}

/// A film together with every row scoped to it, written as one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmRecordInput {
    pub film: FilmInput,
    pub production_details: Vec<ProductionDetailInput>,
    pub authors: Vec<AuthorInput>,
    pub production_team: Vec<TeamMemberInput>,
    pub actors: Vec<ActorInput>,
    pub equipment: Vec<EquipmentInput>,
    pub documents: Vec<DocumentInput>,
    pub institutional_info: Vec<InstitutionalInfoInput>,
    pub screenings: Vec<ScreeningInput>,
}

impl FilmRecordInput {
    pub(crate) fn validate(&self) -> AppResult<()> {
        self.film.validate()?;
        self.production_details.iter().try_for_each(FilmScoped::validate)?;
        self.authors.iter().try_for_each(FilmScoped::validate)?;
        self.production_team.iter().try_for_each(FilmScoped::validate)?;
        self.actors.iter().try_for_each(FilmScoped::validate)?;
        self.equipment.iter().try_for_each(FilmScoped::validate)?;
        self.documents.iter().try_for_each(FilmScoped::validate)?;
        self.institutional_info.iter().try_for_each(FilmScoped::validate)?;
        self.screenings.iter().try_for_each(FilmScoped::validate)
    }
}

/// Parses a stored `screening_date` column back into a calendar date.
pub fn parse_screening_date(raw: Option<&str>) -> AppResult<Option<Date>> {
    raw.map(|s| s.parse::<Date>()).transpose().map_err(AppError::from)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

impl UserInput {
    pub(crate) fn validate(&self) -> AppResult<()> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

/// A user as exposed outside the data-access layer, without the hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub created_at: i64,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self { user_id: m.user_id, username: m.username, role: m.role, created_at: m.created_at }
    }
}

/// A screening with its location resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScreeningDetail {
    pub screening: screening::Model,
    pub date: Option<Date>,
    pub location: Option<location::Model>,
}

/// Everything recorded about one film.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilmDossier {
    pub film: film::Model,
    pub production_details: Vec<(production_detail::Model, Option<location::Model>)>,
    pub authors: Vec<author::Model>,
    pub production_team: Vec<production_team_member::Model>,
    pub actors: Vec<actor::Model>,
    pub equipment: Vec<equipment::Model>,
    pub documents: Vec<document::Model>,
    pub institutional_info: Vec<(institutional_info::Model, Option<location::Model>)>,
    pub screenings: Vec<ScreeningDetail>,
}

impl FilmDossier {
    /// Archive reference line for citing this record.
    pub fn citation(&self, accessed: Date) -> String {
        format!(
            "\"{}\". EAC Lab Database. Indiana University Bloomington. Accessed {}.",
            self.film.title,
            accessed.strftime("%d-%m-%Y"),
        )
    }
}

/// Row count per film-scoped table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilmCounts {
    pub production_details: u64,
    pub authors: u64,
    pub production_team: u64,
    pub actors: u64,
    pub equipment: u64,
    pub documents: u64,
    pub institutional_info: u64,
    pub screenings: u64,
}

impl FilmCounts {
    pub fn total(&self) -> u64 {
        self.production_details
            + self.authors
            + self.production_team
            + self.actors
            + self.equipment
            + self.documents
            + self.institutional_info
            + self.screenings
    }
}

/// Every row of every table, ordered by key. Keys are only meaningful within
/// one snapshot; import assigns fresh ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub films: Vec<film::Model>,
    pub locations: Vec<location::Model>,
    pub production_details: Vec<production_detail::Model>,
    pub authors: Vec<author::Model>,
    pub production_team: Vec<production_team_member::Model>,
    pub actors: Vec<actor::Model>,
    pub equipment: Vec<equipment::Model>,
    pub documents: Vec<document::Model>,
    pub institutional_info: Vec<institutional_info::Model>,
    pub screenings: Vec<screening::Model>,
    pub users: Vec<user::Model>,
}
