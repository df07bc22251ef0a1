#[derive(serde::Deserialize, Debug, Default)]
pub struct SelectedQuery {
    pub selected: Option<usize>,
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct ProceedForm {
    pub package_index: Option<usize>,
}
