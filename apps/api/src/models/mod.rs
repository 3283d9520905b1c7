pub mod cover_letter;
pub mod resume;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub use cover_letter::{CoverLetter, CoverLetterFields};
pub use resume::{EducationEntry, ExperienceEntry, Resume, ResumeFields};

/// Reads JSON `null` as the type's default, so `"skills": null` means empty.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A persisted, owner-scoped document: the client-supplied fields plus the
/// identity and timestamps the store assigns.
pub trait Record: Clone + Send + Sync + 'static {
    type Fields: Clone + Send + Sync + 'static;

    /// Human-readable kind used in response messages, e.g. "Resume".
    const KIND: &'static str;

    fn assemble(
        id: Uuid,
        fields: Self::Fields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;

    fn id(&self) -> Uuid;
    fn fields(&self) -> &Self::Fields;
    fn created_at(&self) -> DateTime<Utc>;
    fn owner_of(fields: &Self::Fields) -> &str;

    fn owner_id(&self) -> &str {
        Self::owner_of(self.fields())
    }
}
