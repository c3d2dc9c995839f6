//! End-to-end siting run over a resolved site

use crate::interference::{InterferenceCoefficients, InterferenceEvaluator};
use crate::layout::{
    evaluate_layout, solve_layout, LayoutEvaluation, LayoutOutcome, LayoutProblem,
    LayoutSolverConfig,
};
use crate::wake::{WakeField, WakeModel};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;
use windsite_core::{ResolvedSite, SiteResult};

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct SitingReport {
    pub site: String,
    /// Expected field with every candidate as a wake source
    #[serde(skip)]
    pub field: WakeField,
    pub coefficients: InterferenceCoefficients,
    pub outcome: LayoutOutcome,
    /// Re-evaluation of the incumbent with only the selected turbines
    pub evaluation: Option<LayoutEvaluation>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Field, pricing and selection for one site
#[derive(Debug, Clone)]
pub struct SitingRun<'a> {
    site: &'a ResolvedSite,
    config: LayoutSolverConfig,
    evaluate: bool,
}

impl<'a> SitingRun<'a> {
    pub fn new(site: &'a ResolvedSite) -> Self {
        Self {
            site,
            config: LayoutSolverConfig::from(&site.layout),
            evaluate: true,
        }
    }

    pub fn with_config(mut self, config: LayoutSolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip re-evaluating the chosen layout
    pub fn without_evaluation(mut self) -> Self {
        self.evaluate = false;
        self
    }

    pub fn config(&self) -> &LayoutSolverConfig {
        &self.config
    }

    pub fn wake_model(&self) -> WakeModel {
        WakeModel::new(&self.site.turbine, self.site.decay)
    }

    /// Expected field with all candidates as wake sources
    pub fn field(&self) -> SiteResult<WakeField> {
        self.wake_model()
            .field(&self.site.grid, &self.site.candidates, &self.site.regime)
    }

    pub fn coefficients(&self, field: &WakeField) -> SiteResult<InterferenceCoefficients> {
        InterferenceEvaluator::new(&self.site.turbine.power_curve).evaluate(
            &self.site.grid,
            field,
            &self.site.candidates,
        )
    }

    pub fn problem(&self, coefficients: InterferenceCoefficients) -> SiteResult<LayoutProblem> {
        LayoutProblem::new(
            self.site.candidates.clone(),
            coefficients,
            self.site.layout.turbines,
            self.site.layout.min_separation,
        )
    }

    pub fn run(&self) -> SiteResult<SitingReport> {
        let start = Instant::now();
        info!(site = %self.site.name, candidates = self.site.candidates.len(), "starting siting run");

        let field = self.field()?;
        let coefficients = self.coefficients(&field)?;
        let problem = self.problem(coefficients.clone())?;
        let outcome = solve_layout(&problem, &self.config)?;

        let evaluation = match outcome.incumbent() {
            Some(solution) if self.evaluate => Some(evaluate_layout(self.site, &solution.selected)?),
            _ => None,
        };

        let elapsed = start.elapsed();
        info!(status = outcome.label(), ?elapsed, "siting run finished");

        Ok(SitingReport {
            site: self.site.name.clone(),
            field,
            coefficients,
            outcome,
            evaluation,
            elapsed,
        })
    }
}
