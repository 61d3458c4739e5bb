//! Central Configuration Constants
//!
//! Single source of truth for artifact names and server defaults.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Cardiovascular Risk Prediction API";

/// Default directory holding the three artifacts
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Trained Random Forest
pub const MODEL_FILE: &str = "cardiovascular_risk_model.json";

/// StandardScaler parameters
pub const SCALER_FILE: &str = "feature_scaler.json";

/// Column order, scaled columns and categorical codes
pub const ENCODING_FILE: &str = "encoding_info.json";

/// Attached to every prediction response
pub const DISCLAIMER: &str = "This prediction is for guidance only and does not replace \
    a professional medical consultation.";

/// Local frontends always allowed by CORS
pub const LOCAL_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://localhost:4200",
    "http://localhost:8000",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8000",
];
