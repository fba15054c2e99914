use crate::core::catalog::MarkCatalog;
use crate::core::legs::{self, LegsSnapshot, SpecialLegRules};
use crate::core::map::MapComposer;
use crate::core::tables;
use crate::core::{ConfigProvider, CourseData, Pipeline, RenderedCourse, Storage, WritePolicy};
use crate::utils::error::{Result, ViewerError};

pub struct CoursePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CoursePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn load_catalog(&self) -> Result<MarkCatalog> {
        let path = self.config.marks_file();
        if !self.storage.exists(path).await? {
            return Err(ViewerError::MissingSource {
                path: path.to_string(),
            });
        }

        let data = self.storage.read_file(path).await?;
        let catalog = MarkCatalog::from_csv(&data)?;
        tracing::info!("📍 Loaded {} marks from {}", catalog.len(), path);
        Ok(catalog)
    }

    async fn load_legs(&self) -> Result<(LegsSnapshot, Option<Vec<u8>>)> {
        let path = self.config.legs_file();
        if !self.storage.exists(path).await? {
            tracing::info!("No legs file at {}, starting with an empty course", path);
            return Ok((LegsSnapshot::absent(), None));
        }

        let data = self.storage.read_file(path).await?;
        let snapshot = LegsSnapshot::from_csv(&data)?;
        tracing::info!("🧭 Loaded {} legs from {}", snapshot.legs.len(), path);

        if snapshot.needs_migration() {
            let migrated = self.persist_migration(&snapshot).await?;
            return Ok((snapshot, Some(migrated)));
        }

        Ok((snapshot, Some(data)))
    }

    /// 舊格式升級：補上 Color 欄位後立即寫回
    async fn persist_migration(&self, snapshot: &LegsSnapshot) -> Result<Vec<u8>> {
        let path = self.config.legs_file();
        let data = legs::legs_to_csv(&snapshot.legs)?;
        self.storage.write_file(path, &data).await?;
        tracing::info!("🔧 Migrated {} to include the Color column", path);
        Ok(data)
    }

    async fn persist_legs(&self, data: &[u8], changed: bool) -> Result<()> {
        let path = self.config.legs_file();
        match self.config.write_policy() {
            WritePolicy::OnChange if !changed => {
                tracing::debug!("Legs unchanged, skipping rewrite of {}", path);
            }
            _ => {
                self.storage.write_file(path, data).await?;
                tracing::debug!("Wrote legs to {}", path);
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CoursePipeline<S, C> {
    async fn extract(&self) -> Result<CourseData> {
        let catalog = self.load_catalog().await?;
        let (legs, legs_on_disk) = self.load_legs().await?;

        Ok(CourseData {
            catalog,
            legs,
            legs_on_disk,
        })
    }

    async fn transform(&self, data: CourseData) -> Result<RenderedCourse> {
        let CourseData {
            catalog,
            legs: snapshot,
            legs_on_disk,
        } = data;
        let mut legs = snapshot.legs;

        for (start, end) in self.config.added_legs() {
            let leg = legs::measure_leg(&catalog, &start, &end)?;
            tracing::info!("➕ Added leg {}", leg.tooltip());
            legs.push(leg);
        }

        let rules = SpecialLegRules::new(self.config.special_legs());
        let special_legs = rules.annotate(&mut legs);
        tracing::debug!(
            "{} of {} legs match {} special rules",
            special_legs,
            legs.len(),
            rules.rules().len()
        );

        // 航段先寫回，之後才解析座標；未知標記只會中止地圖輸出
        let legs_csv = legs::legs_to_csv(&legs)?;
        let legs_changed = legs_on_disk.as_deref() != Some(legs_csv.as_slice());
        self.persist_legs(&legs_csv, legs_changed).await?;

        let resolved = legs::resolve_legs(&legs, &catalog)?;
        let composer = MapComposer::new(self.config.map_settings());
        let html = composer.compose(&catalog, &resolved, &self.config.view_state())?;

        Ok(RenderedCourse {
            legend_text: tables::legend_text(&catalog),
            legs_text: tables::legs_text(&legs),
            legs,
            html,
            special_legs,
            legs_changed,
        })
    }

    async fn load(&self, result: RenderedCourse) -> Result<String> {
        let html_path = self.config.html_file();
        self.storage
            .write_file(html_path, result.html.as_bytes())
            .await?;
        tracing::debug!("Wrote map document ({} bytes)", result.html.len());

        Ok(format!("{}/{}", self.config.data_dir(), html_path))
    }
}
