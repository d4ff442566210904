#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VolunteersRow {
    pub volunteer_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
