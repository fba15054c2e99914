use crate::core::Pipeline;
use crate::utils::error::Result;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub marks: usize,
    pub legs: usize,
    pub special_legs: usize,
    pub legend_text: String,
    pub legs_text: String,
}

pub struct ViewerEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ViewerEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting course viewer run...");

        // Extract
        let data = self.pipeline.extract().await?;
        let marks = data.catalog.len();
        tracing::info!(
            "Extracted {} marks and {} saved legs",
            marks,
            data.legs.legs.len()
        );

        // Transform
        let rendered = self.pipeline.transform(data).await?;
        tracing::info!(
            "Annotated {} legs ({} special)",
            rendered.legs.len(),
            rendered.special_legs
        );

        let legs = rendered.legs.len();
        let special_legs = rendered.special_legs;
        let legend_text = rendered.legend_text.clone();
        let legs_text = rendered.legs_text.clone();

        // Load
        let output_path = self.pipeline.load(rendered).await?;
        tracing::info!("Map saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            marks,
            legs,
            special_legs,
            legend_text,
            legs_text,
        })
    }
}
