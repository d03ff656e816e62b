/// Options that control how datasets are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Fail when a table carries columns the catalog does not know.
    pub reject_extra_columns: bool,
    /// Accepted date layouts (chrono format strings), tried in order.
    pub date_formats: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            reject_extra_columns: false,
            date_formats: vec!["%Y-%m-%d".to_string(), "%d-%m-%Y".to_string()],
        }
    }
}
