use serde::{Deserialize, Serialize};

use crate::data::dataset::Dataset;
use crate::data::loader::DataSource;
use crate::data::record::{Field, Record};
use crate::error::QueryError;
use crate::state::selection::{query_slice, HoverPoint, Selection};
use crate::state::settings::ViewerSettings;
use crate::state::theme::Theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the viewer knows. Owned by the application; no globals.
#[derive(Debug, Default)]
pub struct AppState {
    pub dataset: Option<Dataset>,
    pub selection: Option<Selection>,
    /// Hover point kept after a click, shown in the waveform panel.
    pub pinned: Option<HoverPoint>,
    pub settings: ViewerSettings,
    pub theme: Theme,
    /// Selection to restore once the next dataset finishes loading.
    pub pending_selection: Option<Selection>,
    /// Incremented on every installed dataset.
    pub generation: u64,
}

/// The persisted part of [`AppState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub version: String,
    pub source: Option<DataSource>,
    pub selection: Option<Selection>,
    #[serde(default)]
    pub settings: ViewerSettings,
    #[serde(default)]
    pub theme: Theme,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset. The selection becomes the pending one if it
    /// resolves to a slice of the new data, otherwise the domain minimum.
    pub fn install_dataset(&mut self, dataset: Dataset) {
        let restored = self
            .pending_selection
            .take()
            .filter(|s| query_slice(&dataset.index, s).is_ok());
        self.selection = restored.or_else(|| Selection::initial(&dataset.domains));
        self.pinned = None;
        self.dataset = Some(dataset);
        self.generation += 1;
    }

    /// Apply a slider change for A2 or A3.
    pub fn select(&mut self, field: Field, value: f64) -> Result<(), QueryError> {
        let selection = match self.selection.as_mut() {
            Some(s) => s,
            None => return Ok(()),
        };
        selection.select(field, value)?;
        let selection = *selection;
        if let Some(dataset) = &self.dataset {
            if !dataset.domains.get(field).contains(value) {
                tracing::warn!("{} = {value} does not occur in the dataset", field.column_name());
            }
        }
        if let Err(e) = self.current_slice() {
            tracing::warn!("Selection {:?} has no data: {e}", selection);
        }
        Ok(())
    }

    /// The records of the current selection.
    pub fn current_slice(&self) -> Result<&[Record], QueryError> {
        match (&self.dataset, &self.selection) {
            (Some(dataset), Some(selection)) => query_slice(&dataset.index, selection),
            (_, Some(selection)) => Err(QueryError::MissingSlice {
                a2: selection.a2,
                a3: selection.a3,
            }),
            (_, None) => Ok(&[]),
        }
    }

    pub fn session(&self) -> Session {
        Session {
            version: VERSION.to_string(),
            source: self.dataset.as_ref().map(|d| d.source.clone()),
            selection: self.selection,
            settings: self.settings.clone(),
            theme: self.theme,
        }
    }

    /// Apply a loaded session. Returns the data source that still has to be
    /// loaded, if it differs from the current one.
    pub fn apply_session(&mut self, session: Session) -> Option<DataSource> {
        self.settings = session.settings;
        self.theme = session.theme;

        let current = self.dataset.as_ref().map(|d| &d.source);
        match session.source {
            Some(source) if current != Some(&source) => {
                self.pending_selection = session.selection;
                match source {
                    DataSource::Generated { .. } => None,
                    other => Some(other),
                }
            }
            _ => {
                if let Some(selection) = session.selection {
                    self.selection = Some(selection);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dataset() -> Dataset {
        Dataset::new(
            DataSource::File(PathBuf::from("sweep.csv")),
            vec![
                Record::new(0.5, 0.5, 0.0, 0.0, 1.2),
                Record::new(0.5, 0.5, 0.0, 0.1, 0.8),
                Record::new(0.6, 0.5, 0.0, 0.0, 2.0),
            ],
        )
    }

    #[test]
    fn install_selects_domain_minimum() {
        let mut state = AppState::new();
        state.install_dataset(dataset());
        assert_eq!(state.selection, Some(Selection::new(0.5, 0.5)));
        assert_eq!(state.current_slice().unwrap().len(), 2);
    }

    #[test]
    fn install_restores_valid_pending_selection() {
        let mut state = AppState::new();
        state.pending_selection = Some(Selection::new(0.6, 0.5));
        state.install_dataset(dataset());
        assert_eq!(state.selection, Some(Selection::new(0.6, 0.5)));
        assert!(state.pending_selection.is_none());

        state.pending_selection = Some(Selection::new(9.0, 9.0));
        state.install_dataset(dataset());
        assert_eq!(state.selection, Some(Selection::new(0.5, 0.5)));
    }

    #[test]
    fn every_install_bumps_generation() {
        let mut state = AppState::new();
        assert_eq!(state.generation, 0);
        state.install_dataset(dataset());
        state.install_dataset(dataset());
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn select_reports_missing_slice_without_failing() {
        let mut state = AppState::new();
        state.install_dataset(dataset());
        state.select(Field::A2, 0.9).unwrap();
        assert!(matches!(state.current_slice(), Err(QueryError::MissingSlice { .. })));
        assert!(state.select(Field::Max, 1.0).is_err());
    }

    #[test]
    fn session_round_trip_keeps_selection() {
        let mut state = AppState::new();
        state.install_dataset(dataset());
        state.select(Field::A2, 0.6).unwrap();
        state.theme = Theme::Light;

        let json = serde_json::to_string(&state.session()).unwrap();
        let session: Session = serde_json::from_str(&json).unwrap();

        let mut fresh = AppState::new();
        let to_load = fresh.apply_session(session);
        assert_eq!(to_load, Some(DataSource::File(PathBuf::from("sweep.csv"))));
        assert_eq!(fresh.theme, Theme::Light);

        fresh.install_dataset(dataset());
        assert_eq!(fresh.selection, Some(Selection::new(0.6, 0.5)));
    }

    #[test]
    fn session_for_loaded_source_applies_immediately() {
        let mut state = AppState::new();
        state.install_dataset(dataset());
        let mut session = state.session();
        session.selection = Some(Selection::new(0.6, 0.5));
        assert_eq!(state.apply_session(session), None);
        assert_eq!(state.selection, Some(Selection::new(0.6, 0.5)));
    }
}
