//! Data layer behind the US diabetes prevalence choropleth.
//!
//! ```text
//! diabetes_atlas
//! ├── types    - YearValue, CountyRecord, Selection
//! ├── config   - config.toml loader
//! ├── keys     - state name / FIPS key normalization
//! ├── table    - comma-delimited table reader
//! ├── states   - state boundaries + yearly series merge
//! ├── counties - county boundaries + county statistics merge
//! ├── stats    - national summaries per selection
//! ├── legend   - choropleth shading bins
//! ├── numbers  - one-decimal rounding, lenient number parsing
//! ├── describe - per-region info panel and table rows
//! └── data     - async file loading and batch merges
//! ```

pub mod config;
pub mod counties;
pub mod data;
pub mod describe;
pub mod keys;
pub mod legend;
pub mod numbers;
pub mod states;
pub mod stats;
pub mod table;
pub mod types;
