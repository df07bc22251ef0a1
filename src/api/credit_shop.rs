use derive_more::{Display, Error};
use serde::Serialize;

use crate::{
    consts, metric,
    models::{package::CreditPackage, selection::Selection},
    services::{SessionStore, StorageError},
};

#[derive(Debug, Display, Error, PartialEq)]
pub enum SelectorError {
    #[display("존재하지 않는 패키지입니다: {_0}")]
    UnknownPackage(#[error(not(source))] usize),
}

/// Credits and formatted price of the selected package, shown next to the pay button
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectionSummary {
    pub credit_amount: u32,
    pub price_label: String,
}

/// One package tile as the shop template draws it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PackageTile {
    pub index: usize,
    pub credit_amount: u32,
    pub price_label: String,
    pub is_popular: bool,
    pub is_selected: bool,
}

#[derive(Debug, PartialEq)]
pub enum ProceedOutcome {
    /// Nothing selected, the click is ignored
    NothingSelected,
    /// Selection stored, go to the given path
    Navigate(&'static str),
}

/// Package picker. At most one package is selected at any time
#[derive(Debug, Clone)]
pub struct PackageSelector {
    packages: Vec<CreditPackage>,
    selected: Option<usize>,
}

impl PackageSelector {
    pub fn new(packages: Vec<CreditPackage>) -> Self {
        Self {
            packages,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&CreditPackage> {
        self.selected.and_then(|i| self.packages.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The pay button is enabled once a package is selected
    pub fn can_proceed(&self) -> bool {
        self.selected.is_some()
    }

    /// Replaces the current selection with the package at `index`
    pub fn select_package(&mut self, index: usize) -> Result<SelectionSummary, SelectorError> {
        let package = self
            .packages
            .get(index)
            .ok_or(SelectorError::UnknownPackage(index))?;

        let summary = SelectionSummary {
            credit_amount: package.credit_amount,
            price_label: package.price_label(),
        };
        self.selected = Some(index);

        Ok(summary)
    }

    /// Selects the first popular package, as if the user had clicked it
    pub fn auto_select_default(&mut self) -> Option<SelectionSummary> {
        let index = self.packages.iter().position(|p| p.is_popular)?;
        self.select_package(index).ok()
    }

    pub fn summary(&self) -> Option<SelectionSummary> {
        self.selected().map(|package| SelectionSummary {
            credit_amount: package.credit_amount,
            price_label: package.price_label(),
        })
    }

    pub fn tiles(&self) -> Vec<PackageTile> {
        self.packages
            .iter()
            .enumerate()
            .map(|(index, package)| PackageTile {
                index,
                credit_amount: package.credit_amount,
                price_label: package.price_label(),
                is_popular: package.is_popular,
                is_selected: self.selected == Some(index),
            })
            .collect()
    }

    /// Stores the selection and points to the payment page. A no-op without a selection,
    /// a failed write aborts the navigation.
    pub fn proceed(&self, store: &dyn SessionStore) -> Result<ProceedOutcome, StorageError> {
        let Some(package) = self.selected() else {
            return Ok(ProceedOutcome::NothingSelected);
        };

        Selection::from(package).write_to(store)?;
        metric::incr_shop_action_statds("proceed");

        Ok(ProceedOutcome::Navigate(consts::PAYMENT_PAGE_PATH))
    }
}
