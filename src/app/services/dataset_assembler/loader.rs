//! The [`DatasetAssembler`] and its per-kind load entry points.
//!
//! All four entry points share one algorithm shape: validate axes, allocate
//! the full-shape NaN-prefilled result arrays, iterate the axis
//! cross-product in request order, read each leaf file, and reduce nested
//! dimensions into the date's slice of the result. The assembler holds no
//! state across calls.

use crate::app::adapters::geogrid::GeoGrid;
use crate::app::adapters::wgrib::WgribDecoder;
use crate::app::models::{
    AxisSpec, ClimatologyData, DataKind, DataPayload, Dataset, EnsembleData, LoadAudit,
};
use crate::app::services::dataset_assembler::{axes, reduce};
use crate::app::services::grid_reader::{
    FileFormat, GribDecoder, GribEdition, GribSelector, GridReader, ReadSpec,
};
use crate::app::services::template_expander::{expand, TemplateContext};
use crate::config::LoaderConfig;
use crate::{Error, Result};
use ndarray::{s, Array2, Array3, ArrayView1};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Assembles multi-file datasets according to a [`LoaderConfig`]
pub struct DatasetAssembler {
    config: LoaderConfig,
    grid: GeoGrid,
    reader: GridReader,
}

impl DatasetAssembler {
    /// Create an assembler backed by the wgrib subprocess decoder
    pub fn new(config: LoaderConfig, grid: GeoGrid) -> Self {
        Self::with_decoder(config, grid, Arc::new(WgribDecoder::default()))
    }

    /// Create an assembler with an explicit GRIB decoder (tests, custom tools)
    pub fn with_decoder(config: LoaderConfig, grid: GeoGrid, decoder: Arc<dyn GribDecoder>) -> Self {
        Self {
            config,
            grid,
            reader: GridReader::new(decoder),
        }
    }

    pub fn grid(&self) -> &GeoGrid {
        &self.grid
    }

    /// Load an observation dataset: one file per date, `obs[date, point]`
    pub fn load_obs(&self, dates: &AxisSpec) -> Result<Dataset> {
        self.config.validate()?;
        axes::validate_date_axis(dates)?;

        let npoints = self.grid.point_count();
        let mut obs = Array2::from_elem((dates.len(), npoints), f32::NAN);
        let mut audit = LoadAudit::new(dates.values());

        for (d, date) in dates.iter().enumerate() {
            let ctx = TemplateContext::for_date(date)?;
            let path = expand(&self.config.file_template, &ctx)?;
            match self.read_leaf(&path, None, None) {
                Ok(values) => obs.row_mut(d).assign(&ArrayView1::from(&values[..])),
                Err(Error::Reading { file, reason }) => {
                    warn!(date = %date, file = %file.display(), %reason, "missing observation file");
                    audit.record_missing(date, file);
                }
                Err(e) => return Err(e),
            }
        }

        info!(kind = "observation", summary = %audit.summary(), "load complete");
        Ok(Dataset {
            kind: DataKind::Observation,
            audit,
            payload: DataPayload::Observation { obs },
        })
    }

    /// Load a deterministic forecast dataset, reduced over the forecast-hour
    /// axis: `fcst[date, point]`
    pub fn load_dtrm_fcsts(&self, dates: &AxisSpec, fhrs: &AxisSpec) -> Result<Dataset> {
        self.config.validate()?;
        axes::validate_forecast_axes(dates, fhrs)?;

        let npoints = self.grid.point_count();
        let mut fcst = Array2::from_elem((dates.len(), npoints), f32::NAN);
        let mut audit = LoadAudit::new(dates.values());

        for (d, date) in dates.iter().enumerate() {
            let date_ctx = TemplateContext::for_date(date)?;
            let scratch = self.load_fhr_block(&date_ctx, fhrs, None, date, &mut audit)?;
            fcst.row_mut(d)
                .assign(&reduce::reduce_fhr(scratch.view(), self.config.fhr_stat));
        }

        info!(kind = "forecast", summary = %audit.summary(), "load complete");
        Ok(Dataset {
            kind: DataKind::Forecast,
            audit,
            payload: DataPayload::DeterministicForecast { fcst },
        })
    }

    /// Load an ensemble forecast dataset, reduced over the forecast-hour
    /// axis per member: `ens[date, member, point]`
    pub fn load_ens_fcsts(
        &self,
        dates: &AxisSpec,
        fhrs: &AxisSpec,
        members: &AxisSpec,
    ) -> Result<Dataset> {
        self.config.validate()?;
        axes::validate_ensemble_axes(dates, fhrs, members)?;

        let npoints = self.grid.point_count();
        let mut ens = Array3::from_elem((dates.len(), members.len(), npoints), f32::NAN);
        let mut audit = LoadAudit::new(dates.values());

        for (d, date) in dates.iter().enumerate() {
            let date_ctx = TemplateContext::for_date(date)?;
            for (m, member) in members.iter().enumerate() {
                let scratch =
                    self.load_fhr_block(&date_ctx, fhrs, Some(member), date, &mut audit)?;
                ens.slice_mut(s![d, m, ..])
                    .assign(&reduce::reduce_fhr(scratch.view(), self.config.fhr_stat));
            }
        }

        info!(kind = "forecast", summary = %audit.summary(), "load complete");
        Ok(Dataset {
            kind: DataKind::Forecast,
            audit,
            payload: DataPayload::EnsembleForecast(EnsembleData::new(ens)),
        })
    }

    /// Load a climatology dataset keyed by day-of-year:
    /// `climo[day, ptile, point]`.
    ///
    /// With a percentile list, record `i` of each day's file holds the
    /// values for percentile `i`; without one the ptile axis has length 1.
    pub fn load_climo(&self, days: &AxisSpec, ptiles: Option<&[f64]>) -> Result<Dataset> {
        self.config.validate()?;
        axes::validate_day_axis(days)?;
        if let Some(ptiles) = ptiles {
            if ptiles.is_empty() {
                return Err(Error::configuration("percentile list cannot be empty"));
            }
            if ptiles.iter().any(|p| !(0.0..=100.0).contains(p)) {
                return Err(Error::configuration("percentiles must lie in [0, 100]"));
            }
            if self.config.format != FileFormat::FlatBinary {
                return Err(Error::configuration(
                    "percentile climatologies require flat binary files",
                ));
            }
        }

        let npoints = self.grid.point_count();
        let nptiles = ptiles.map_or(1, <[f64]>::len);
        let mut climo = Array3::from_elem((days.len(), nptiles, npoints), f32::NAN);
        let mut audit = LoadAudit::new(days.values());

        for (i, day) in days.iter().enumerate() {
            let ctx = TemplateContext::for_day(day)?;
            let path = expand(&self.config.file_template, &ctx)?;
            for p in 0..nptiles {
                let record_index = ptiles.is_some().then_some(p);
                match self.read_leaf(&path, None, record_index) {
                    Ok(values) => climo
                        .slice_mut(s![i, p, ..])
                        .assign(&ArrayView1::from(&values[..])),
                    Err(Error::Reading { file, reason }) => {
                        warn!(day = %day, file = %file.display(), %reason, "missing climatology file");
                        audit.record_missing(day, file);
                        // one bad record condemns the day's file
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(kind = "climatology", summary = %audit.summary(), "load complete");
        Ok(Dataset {
            kind: DataKind::Climatology,
            audit,
            payload: DataPayload::Climatology(ClimatologyData {
                day_keys: days.values().to_vec(),
                ptiles: ptiles.map(<[f64]>::to_vec),
                climo,
            }),
        })
    }

    /// Read every forecast hour of one date (and optional member) into a
    /// NaN-prefilled `[fhr, point]` scratch buffer, recording failures
    fn load_fhr_block(
        &self,
        date_ctx: &TemplateContext,
        fhrs: &AxisSpec,
        member: Option<&str>,
        date: &str,
        audit: &mut LoadAudit,
    ) -> Result<Array2<f32>> {
        let npoints = self.grid.point_count();
        let mut scratch = Array2::from_elem((fhrs.len(), npoints), f32::NAN);

        for (f, fhr) in fhrs.iter().enumerate() {
            let mut ctx = date_ctx.clone().with_fhr(fhr);
            if let Some(member) = member {
                ctx = ctx.with_member(member);
            }
            let path = expand(&self.config.file_template, &ctx)?;
            let grep_fhr = self.config.remove_dup_grib_fhrs.then_some(fhr.as_str());
            match self.read_leaf(&path, grep_fhr, None) {
                Ok(values) => scratch.row_mut(f).assign(&ArrayView1::from(&values[..])),
                Err(Error::Reading { file, reason }) => {
                    warn!(date = %date, file = %file.display(), %reason, "missing forecast file");
                    audit.record_missing(date, file);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(scratch)
    }

    /// Read one leaf file with the configured format, selector and yrev flag
    fn read_leaf(
        &self,
        path: &Path,
        grep_fhr: Option<&str>,
        record_index: Option<usize>,
    ) -> Result<Vec<f32>> {
        let spec = self.build_read_spec(grep_fhr, record_index)?;
        let values = self.reader.read(path, &spec, &self.grid)?;
        debug!(file = %path.display(), "loaded record");
        Ok(values)
    }

    fn build_read_spec(
        &self,
        grep_fhr: Option<&str>,
        record_index: Option<usize>,
    ) -> Result<ReadSpec> {
        let mut spec = match self.config.format {
            FileFormat::FlatBinary => ReadSpec::flat_binary(),
            FileFormat::Grib1 | FileFormat::Grib2 => {
                let variable = self.config.grib_var.as_ref().ok_or_else(|| {
                    Error::configuration("GRIB formats require a variable selector")
                })?;
                let level = self.config.grib_level.as_ref().ok_or_else(|| {
                    Error::configuration("GRIB formats require a level selector")
                })?;
                let mut selector = GribSelector::new(variable, level);
                if let Some(fhr) = grep_fhr {
                    selector = selector.with_grep_fhr(fhr);
                }
                let edition = match self.config.format {
                    FileFormat::Grib1 => GribEdition::Grib1,
                    _ => GribEdition::Grib2,
                };
                ReadSpec::grib(edition, selector)
            }
        };
        if let Some(index) = record_index {
            spec = spec.with_record_index(index);
        }
        Ok(spec.with_yrev(self.config.yrev))
    }
}
