//! Scan session: pending screenshots per category and the sheet they fill.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::sheet::StatSheet;
use crate::models::StatCategory;

use super::{ScanResult, StatPipeline};

/// Collects screenshots for the categories of one character and scans them
/// one at a time into a [`StatSheet`].
///
/// At most one screenshot waits per category: enqueuing another for the
/// same category replaces the waiting one and moves it to the back.
pub struct ScanSession {
    pipeline: StatPipeline,
    pending: VecDeque<(StatCategory, Vec<u8>)>,
    sheet: StatSheet,
}

impl ScanSession {
    /// Start an empty session.
    pub fn new(pipeline: StatPipeline) -> Self {
        Self::with_sheet(pipeline, StatSheet::new())
    }

    /// Continue editing an existing sheet.
    pub fn with_sheet(pipeline: StatPipeline, sheet: StatSheet) -> Self {
        Self {
            pipeline,
            pending: VecDeque::new(),
            sheet,
        }
    }

    /// Queue a screenshot for `category`. Returns true if it replaced one
    /// that was still waiting.
    pub fn enqueue(&mut self, category: StatCategory, bytes: Vec<u8>) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(c, _)| *c != category);
        let replaced = self.pending.len() != before;

        self.pending.push_back((category, bytes));
        debug!(
            "Queued {} screenshot ({} waiting{})",
            category,
            self.pending.len(),
            if replaced { ", replaced previous" } else { "" }
        );
        replaced
    }

    /// Screenshots waiting to be scanned.
    pub fn queue_len(&self) -> usize {
        self.pending.len()
    }

    /// Categories waiting, in scan order.
    pub fn queued(&self) -> Vec<StatCategory> {
        self.pending.iter().map(|(c, _)| *c).collect()
    }

    /// Scan the oldest waiting screenshot.
    ///
    /// On success the category's slot is replaced; on failure the previous
    /// slot is kept so earlier results and manual edits survive.
    pub async fn run_next(&mut self) -> Option<(StatCategory, Result<ScanResult>)> {
        let (category, bytes) = self.pending.pop_front()?;

        let outcome = self.pipeline.scan(&bytes, category).await;
        match &outcome {
            Ok(result) => self.sheet.set_slot(category, result.clone().into()),
            Err(e) => warn!("Scan of {} failed: {}", category, e),
        }

        Some((category, outcome))
    }

    /// Scan every waiting screenshot in order. A failed category does not
    /// stop the others.
    pub async fn run_pending(&mut self) -> Vec<(StatCategory, Result<ScanResult>)> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        while let Some(outcome) = self.run_next().await {
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
        info!("Scanned {} screenshots ({} failed)", outcomes.len(), failed);
        outcomes
    }

    /// The sheet being filled.
    pub fn sheet(&self) -> &StatSheet {
        &self.sheet
    }

    /// Mutable access for manual corrections.
    pub fn sheet_mut(&mut self) -> &mut StatSheet {
        &mut self.sheet
    }

    /// Finish the session and keep the sheet.
    pub fn into_sheet(self) -> StatSheet {
        self.sheet
    }
}
