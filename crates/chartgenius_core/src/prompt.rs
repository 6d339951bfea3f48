//! crates/chartgenius_core/src/prompt.rs
//!
//! The fixed instruction set and structured-output schema sent to the model.

use serde_json::{json, Value};

use crate::domain::ChartType;
use crate::ports::StructuredPrompt;

/// Low temperature keeps repeated analyses of the same text close to each other.
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;

const INSTRUCTIONS: &str = r#"You are an expert data editor and visualization specialist.
Analyze the following article text. Your goal is to break the text into logical reading blocks and insert data visualizations ONLY where they add significant value.

Instructions:
1. Break the original text into 'text' blocks, in reading order. Preserve the original writing style, content, AND LANGUAGE.
2. Identify sections containing numerical data, comparisons, or trends.
3. BE CONSERVATIVE WITH CHARTS: only create a chart if there are at least 2-3 comparable data points, OR a specific percentage/KPI that deserves highlighting.
4. If a section has only one simple number (e.g., "Revenue was 5 million"), do NOT create a chart.
5. Place each 'chart' block IMMEDIATELY after the text block that introduces its data.
6. Choose exactly one chart type per chart:
   - 'bar': comparisons of distinct categories (e.g., Q1 vs Q2 vs Q3).
   - 'horizontalBar': category comparisons with long category names.
   - 'line': trends over time.
   - 'area': volume trends over time.
   - 'pie': parts of a whole (max 6 slices).
   - 'radar': performance across multiple variables or cyclical data.
   - 'funnel': stages, processes or conversion pipelines.
   - 'radialBar': a single percentage (0-100) or completion rate.
7. All titles, descriptions, axis labels and category names MUST be in the SAME LANGUAGE as the input text. If the input is Farsi, the chart labels must be Farsi.
8. Data point names must be descriptive (e.g., "Q1 Revenue", not just "Value")."#;

/// Formats the full prompt for one input text.
pub fn build_prompt(text: &str) -> String {
    format!("{INSTRUCTIONS}\n\nInput Text:\n\"{text}\"")
}

fn language_note(what: &str) -> String {
    format!("{what} MUST BE IN THE SAME LANGUAGE AS THE INPUT TEXT.")
}

/// The JSON schema the model's response must satisfy: an array of blocks.
pub fn response_schema() -> Value {
    let chart_types: Vec<&str> = ChartType::ALL.iter().map(|t| t.as_str()).collect();

    let chart_config = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": language_note("A concise chart title.") },
            "description": { "type": "string", "description": language_note("A short caption explaining the insight.") },
            "type": {
                "type": "string",
                "enum": chart_types,
                "description": "The most appropriate chart type. Use 'radialBar' ONLY for a percentage or single KPI score (0-100)."
            },
            "xAxisLabel": { "type": "string", "description": language_note("Label for the X axis (categories).") },
            "yAxisLabel": { "type": "string", "description": language_note("Label for the Y axis (values).") },
            "color": { "type": "string", "nullable": true, "description": "A hex color code relevant to the mood (e.g. #4F46E5)" },
            "data": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": language_note("Category name or label.") },
                        "value": { "type": "number", "description": "Numerical value" }
                    },
                    "required": ["name", "value"]
                }
            }
        },
        "required": ["title", "type", "data", "xAxisLabel", "yAxisLabel"]
    });

    json!({
        "type": "array",
        "description": "An array of content blocks representing the enhanced article.",
        "items": {
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": ["text", "chart"] },
                "content": { "type": "string", "description": "The text content for text blocks. A logical paragraph or section." },
                "chartConfig": chart_config
            },
            "required": ["type"]
        }
    })
}

/// Bundles prompt, schema and sampling settings for one analysis request.
pub fn analysis_request(text: &str) -> StructuredPrompt {
    StructuredPrompt {
        prompt: build_prompt(text),
        schema: response_schema(),
        temperature: ANALYSIS_TEMPERATURE,
    }
}
