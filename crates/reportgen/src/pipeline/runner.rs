use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::advertiser::{resolve_advertiser_name, UNKNOWN_ADVERTISER};
use crate::columns::{ColumnSet, ColumnSpecParser};
use crate::config::{Config, QueryConfig};
use crate::fields::FieldMapper;
use crate::job::{JobAssembler, JobInputs, ValidationQuery};
use crate::sample::SampleReport;
use crate::sanitize;
use crate::schedule::{CronExpression, Lag, LagCalculator, ScheduleInterpreter};
use crate::storage::ArtifactWriter;
use crate::store::AnalyticsStore;
use crate::timespan::{Timespan, TimespanResolver};

use super::context::{PipelineContext, Translation};
use super::error::{PipelineError, PipelineWarning};

/// Result of a completed run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub translation: Translation,
    pub sample: Option<SampleReport>,
    pub job_path: PathBuf,
    pub sample_path: Option<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
}

pub struct Pipeline {
    parser: ColumnSpecParser,
    interpreter: ScheduleInterpreter,
    lag_calculator: LagCalculator,
    assembler: JobAssembler,
    query: QueryConfig,
    store: Arc<dyn AnalyticsStore>,
}

impl Pipeline {
    pub fn from_config(config: &Config, store: Arc<dyn AnalyticsStore>) -> Self {
        Self {
            parser: ColumnSpecParser::new(FieldMapper::from_config(config)),
            interpreter: ScheduleInterpreter::new(config.schedule),
            lag_calculator: LagCalculator::new(config.schedule.baseline_hour),
            assembler: JobAssembler::new(config),
            query: config.query.clone(),
            store,
        }
    }

    /// Resolves every part of the job. Touches the store only for the
    /// advertiser name, and not at all when the context carries one.
    pub async fn translate(&self, ctx: &mut PipelineContext) -> Result<Translation, PipelineError> {
        let span = info_span!("translate",
            ticket = %ctx.request.key,
            advertiser = %ctx.request.advertiser,
            recipients = %sanitize::redact_recipients(&ctx.request.recipients),
        );

        async move {
            let columns = {
                let _step = info_span!("parse_columns").entered();
                self.step_parse_columns(ctx)
            };

            let (cron, lag) = {
                let _step = info_span!("interpret_schedule").entered();
                self.step_schedule(ctx)?
            };

            let timespan = {
                let _step = info_span!("resolve_timespan").entered();
                self.step_timespan(ctx)?
            };

            let advertiser_name = self
                .step_advertiser(ctx)
                .instrument(info_span!("resolve_advertiser_name"))
                .await?;

            let (job, validation) = {
                let _step = info_span!("assemble_job").entered();
                let job = self.assembler.assemble(&JobInputs {
                    columns: &columns,
                    cron: &cron,
                    lag,
                    timespan,
                    delivery: ctx.request.delivery,
                    recipients: &ctx.request.recipients,
                    advertiser: ctx.request.advertiser,
                    advertiser_name: &advertiser_name,
                });
                let validation = ValidationQuery::build(
                    &columns,
                    timespan,
                    ctx.request.advertiser,
                    &self.query.source_table,
                    ctx.today,
                );
                (job, validation)
            };

            info!(cron = %cron, timespan = %timespan, columns = columns.len(), "Translated ticket");
            Ok::<_, PipelineError>(Translation {
                columns,
                cron,
                lag,
                timespan,
                advertiser_name,
                job,
                validation,
            })
        }
        .instrument(span)
        .await
    }

    /// Translates, runs the validation query when `fetch_sample` is set,
    /// then writes the artifacts. Nothing is written if any earlier step
    /// fails.
    pub async fn run(
        &self,
        mut ctx: PipelineContext,
        writer: &ArtifactWriter,
        fetch_sample: bool,
    ) -> Result<PipelineOutcome, PipelineError> {
        let span = info_span!("pipeline",
            ticket = %ctx.request.key,
            job_file = %sanitize::redact_path(writer.job_path()),
        );

        async move {
            let translation = self.translate(&mut ctx).await?;

            let sample = if fetch_sample {
                let sample = self
                    .step_fetch_sample(&mut ctx, &translation.validation)
                    .instrument(info_span!("fetch_sample"))
                    .await?;
                Some(sample)
            } else {
                debug!("Sample extract skipped");
                None
            };

            let _step = info_span!("write_artifacts").entered();
            let job_path = writer.write_job(&translation.job)?;
            let sample_path = match &sample {
                Some(report) => Some(writer.write_sample(&report.to_delimited())?),
                None => None,
            };

            info!(
                warnings = ctx.warnings.len(),
                sample_rows = sample.as_ref().map_or(0, SampleReport::row_count),
                "Pipeline completed"
            );

            Ok::<_, PipelineError>(PipelineOutcome {
                translation,
                sample,
                job_path,
                sample_path,
                warnings: ctx.warnings,
            })
        }
        .instrument(span)
        .await
    }

    fn step_parse_columns(&self, ctx: &mut PipelineContext) -> ColumnSet {
        let columns = self.parser.parse(&ctx.request.columns);
        for spec in columns.unmapped() {
            ctx.warnings.push(PipelineWarning::UnmappedField {
                key: spec.key.clone(),
                alias: spec.alias.clone(),
            });
        }
        columns
    }

    fn step_schedule(&self, ctx: &PipelineContext) -> Result<(CronExpression, Lag), PipelineError> {
        let lines: Vec<&str> = ctx.request.schedule.lines().collect();
        let cron = self.interpreter.interpret(&lines)?;
        let lag = self.lag_calculator.calculate(&cron.to_string())?;
        Ok((cron, lag))
    }

    fn step_timespan(&self, ctx: &PipelineContext) -> Result<Timespan, PipelineError> {
        let lines: Vec<&str> = ctx.request.timespan.lines().collect();
        Ok(TimespanResolver::new(ctx.today).resolve(&lines)?)
    }

    async fn step_advertiser(&self, ctx: &mut PipelineContext) -> Result<String, PipelineError> {
        if let Some(name) = &ctx.advertiser_name {
            debug!("Using supplied advertiser name");
            return Ok(name.clone());
        }

        let name = resolve_advertiser_name(
            self.store.as_ref(),
            &self.query,
            ctx.request.advertiser,
            ctx.today,
        )
        .await?;
        if name == UNKNOWN_ADVERTISER {
            warn!("Advertiser name not found in the analytics store");
            ctx.warnings.push(PipelineWarning::UnknownAdvertiser);
        }
        Ok(name)
    }

    async fn step_fetch_sample(
        &self,
        ctx: &mut PipelineContext,
        validation: &ValidationQuery,
    ) -> Result<SampleReport, PipelineError> {
        debug!(start = %validation.start, end = %validation.end, "Running validation query");
        let result = self.store.query(&validation.sql).await?;
        let report = SampleReport::from_query_result(&result);
        if report.rows.is_empty() {
            warn!("Validation query returned no rows");
            ctx.warnings.push(PipelineWarning::EmptySample);
        }
        Ok(report)
    }
}
