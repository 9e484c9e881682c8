use crate::entities::person_entity as persons;
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};

/// 默认成员名单（全部初始为缺席）
pub const DEFAULT_ROSTER: [&str; 30] = [
    "Jean-Pierre Dupont",
    "Marie-Claire Martin",
    "François Leblanc",
    "Sophie Bernard",
    "Michel Moreau",
    "Isabelle Petit",
    "Philippe Durand",
    "Catherine Leroy",
    "Alain Robert",
    "Nathalie Simon",
    "Thierry Laurent",
    "Valérie Morel",
    "Pascal Roux",
    "Sandrine David",
    "Laurent Bertrand",
    "Céline Girard",
    "Patrick Bonnet",
    "Aurélie Dupuis",
    "Nicolas Fontaine",
    "Émilie Rousseau",
    "Stéphane Vincent",
    "Caroline Chevalier",
    "Jérôme Blanchard",
    "Delphine Gauthier",
    "Christophe Garcia",
    "Laure Martinez",
    "Frédéric Nguyen",
    "Sylvie Mercier",
    "Antoine Lefebvre",
    "Julie Perrin",
];

/// Inserts the default roster when the persons table is empty.
/// Returns the number of inserted rows (0 when the table already has data).
pub async fn seed_default_roster(pool: &DatabaseConnection) -> AppResult<usize> {
    let existing = persons::Entity::find().count(pool).await?;
    if existing > 0 {
        log::info!("Roster already seeded ({existing} persons), skipping");
        return Ok(0);
    }

    let now = Utc::now();
    let rows = DEFAULT_ROSTER.iter().map(|name| persons::ActiveModel {
        name: Set(name.to_string()),
        present: Set(false),
        win_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    });
    persons::Entity::insert_many(rows).exec(pool).await?;

    log::info!("Seeded roster with {} persons", DEFAULT_ROSTER.len());
    Ok(DEFAULT_ROSTER.len())
}
