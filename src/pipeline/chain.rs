use crate::{
    filters::filter::{Filter, Outcome, Target},
    foundation::{
        core::{PixelBuffer, Rect},
        error::{FilterError, FilterResult},
    },
};

/// What a chain does when one of its stages fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log the failure, leave that stage's pixels untouched, continue.
    #[default]
    Skip,
    /// Return the first error; later stages do not run and the target is not written.
    Abort,
}

/// Per-stage result recorded by [`FilterChain::apply`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StageStatus {
    /// The stage transformed the region.
    Applied,
    /// The stage had nothing to do.
    Unchanged,
    /// The stage failed and was skipped; holds the error message.
    Skipped(String),
}

/// Outcome of one stage of a chain run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StageReport {
    /// Position of the stage in the chain.
    pub index: usize,
    /// Filter type name.
    pub filter: &'static str,
    /// What happened.
    pub status: StageStatus,
}

/// Summary of a chain run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ChainReport {
    /// One entry per stage, in order.
    pub stages: Vec<StageReport>,
}

impl ChainReport {
    /// Number of stages that changed pixels.
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, StageStatus::Applied))
    }

    /// Number of stages that failed and were skipped.
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, StageStatus::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&StageStatus) -> bool) -> usize {
        self.stages.iter().filter(|s| pred(&s.status)).count()
    }
}

/// Ordered list of filters applied one after another over the same region.
///
/// The first stage sees the source pixels; every later stage sees the
/// previous stage's output.
#[derive(Clone, Debug, Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
    policy: ErrorPolicy,
}

impl FilterChain {
    /// Empty chain with the default [`ErrorPolicy::Skip`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain from a list of filters.
    pub fn from_filters(filters: Vec<Box<dyn Filter>>) -> Self {
        Self {
            filters,
            policy: ErrorPolicy::default(),
        }
    }

    /// Same chain with a different error policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a stage.
    pub fn push(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Append an already boxed stage.
    pub fn push_boxed(&mut self, filter: Box<dyn Filter>) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Error policy in effect.
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// `true` when the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Stages in application order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    /// Margin needed by the whole chain: the stage margins added together.
    pub fn bounds(&self) -> Rect {
        self.filters
            .iter()
            .fold(Rect::ZERO, |acc, f| acc.pad(f.bounds()))
    }

    /// Descriptions of all stages, space separated.
    pub fn describe(&self) -> String {
        self.filters
            .iter()
            .map(|f| f.describe())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run every stage over `rect` of `buffer`, writing to `target`.
    ///
    /// Stages work on a copy of the source region; the target is written once,
    /// after the last stage, and only if some stage changed pixels. Nothing is
    /// written when the chain fails, whatever the policy.
    #[tracing::instrument(skip(self, buffer, target), fields(stages = self.filters.len()))]
    pub fn apply(
        &self,
        buffer: &mut PixelBuffer,
        rect: Rect,
        target: Target<'_>,
    ) -> FilterResult<ChainReport> {
        if rect.width < 0 || rect.height < 0 {
            return Err(FilterError::buffer_access(format!(
                "chain region has negative size {}x{}",
                rect.width, rect.height
            )));
        }
        let displaced = match &target {
            Target::InPlace => false,
            Target::At { x, y } => (*x, *y) != (rect.x, rect.y),
            Target::Buffer { .. } => true,
        };
        if displaced && let Some(f) = self.filters.iter().find(|f| f.requires_in_place()) {
            return Err(FilterError::configuration(format!(
                "{} stage cannot write to a separate target",
                f.name()
            )));
        }

        let mut region = buffer.read_region(rect)?;
        let (dst, x, y) = match target {
            Target::InPlace => (buffer, rect.x, rect.y),
            Target::At { x, y } => (buffer, x, y),
            Target::Buffer { buffer: dst, x, y } => (dst, x, y),
        };
        dst.check_region(Rect::new(x, y, rect.width, rect.height))?;

        let report = self.run_stages(&mut region)?;
        if report.applied() > 0 {
            dst.write_region(x, y, &region)?;
        }
        Ok(report)
    }

    fn run_stages(&self, region: &mut PixelBuffer) -> FilterResult<ChainReport> {
        let rect = region.rect();
        let mut report = ChainReport::default();
        for (index, filter) in self.filters.iter().enumerate() {
            let status = match filter.apply(region, rect, Target::InPlace) {
                Ok(Outcome::Applied) => StageStatus::Applied,
                Ok(Outcome::Unchanged) => StageStatus::Unchanged,
                Err(err) if self.policy == ErrorPolicy::Skip => {
                    tracing::warn!(index, filter = filter.name(), error = %err, "skipping filter");
                    StageStatus::Skipped(err.to_string())
                }
                Err(err) => return Err(err),
            };
            tracing::debug!(index, filter = filter.name(), ?status, "filter stage done");
            report.stages.push(StageReport {
                index,
                filter: filter.name(),
                status,
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/chain.rs"]
mod tests;
