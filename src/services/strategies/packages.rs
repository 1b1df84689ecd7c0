//! Package knowledge shared by the runtime and dependency strategies.

/// Import name -> distribution name for widely used Python packages.
const WELL_KNOWN_PYTHON: &[(&str, &str)] = &[
    ("requests", "requests"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("fastapi", "fastapi"),
    ("uvicorn", "uvicorn"),
    ("numpy", "numpy"),
    ("pandas", "pandas"),
    ("scipy", "scipy"),
    ("matplotlib", "matplotlib"),
    ("pytest", "pytest"),
    ("yaml", "PyYAML"),
    ("dotenv", "python-dotenv"),
    ("PIL", "Pillow"),
    ("sklearn", "scikit-learn"),
    ("bs4", "beautifulsoup4"),
    ("cv2", "opencv-python"),
    ("dateutil", "python-dateutil"),
    ("jwt", "PyJWT"),
    ("google", "google-api-python-client"),
    ("gspread", "gspread"),
    ("sqlalchemy", "SQLAlchemy"),
    ("pydantic", "pydantic"),
    ("jinja2", "Jinja2"),
    ("werkzeug", "Werkzeug"),
    ("click", "click"),
    ("streamlit", "streamlit"),
    ("plotly", "plotly"),
    ("dash", "dash"),
    ("psycopg2", "psycopg2-binary"),
    ("redis", "redis"),
    ("boto3", "boto3"),
    ("httpx", "httpx"),
    ("aiohttp", "aiohttp"),
];

/// npm packages treated as well known.
const WELL_KNOWN_NODE: &[&str] = &[
    "react",
    "react-dom",
    "next",
    "vue",
    "express",
    "axios",
    "lodash",
    "typescript",
    "jest",
    "vitest",
    "eslint",
    "prettier",
    "webpack",
    "vite",
    "@babel/core",
    "@types/node",
    "@types/react",
    "firebase",
    "dotenv",
    "zod",
];

/// Distribution name for a well-known Python import name.
pub fn well_known_python_distribution(module: &str) -> Option<&'static str> {
    WELL_KNOWN_PYTHON
        .iter()
        .find(|(import, _)| import.eq_ignore_ascii_case(module))
        .map(|(_, dist)| *dist)
}

/// Whether `package` is a widely used npm package.
pub fn is_well_known_node_package(package: &str) -> bool {
    WELL_KNOWN_NODE.contains(&package)
}

/// A runtime failure signature caused by an upstream release, and the pin
/// that restores a compatible version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownIncompatibility {
    /// Substring identifying the failure.
    pub signature: &'static str,
    /// Requirement line that fixes it.
    pub pin: &'static str,
    /// Short human explanation.
    pub reason: &'static str,
}

const KNOWN_INCOMPATIBILITIES: &[KnownIncompatibility] = &[
    KnownIncompatibility {
        signature: "cannot import name 'url_quote' from 'werkzeug.urls'",
        pin: "Werkzeug==2.3.7",
        reason: "Werkzeug 3 removed url_quote, still used by older Flask releases",
    },
    KnownIncompatibility {
        signature: "cannot import name 'soft_unicode' from 'markupsafe'",
        pin: "MarkupSafe==2.0.1",
        reason: "MarkupSafe 2.1 removed soft_unicode",
    },
    KnownIncompatibility {
        signature: "cannot import name 'escape' from 'jinja2'",
        pin: "Jinja2==3.0.3",
        reason: "Jinja2 3.1 removed the escape re-export",
    },
    KnownIncompatibility {
        signature: "cannot import name 'json' from 'itsdangerous'",
        pin: "itsdangerous==2.0.1",
        reason: "itsdangerous 2.1 removed the json module shim",
    },
    KnownIncompatibility {
        signature: "module 'numpy' has no attribute 'float'",
        pin: "numpy==1.23.5",
        reason: "NumPy 1.24 removed the deprecated np.float alias",
    },
    KnownIncompatibility {
        signature: "module 'numpy' has no attribute 'int'",
        pin: "numpy==1.23.5",
        reason: "NumPy 1.24 removed the deprecated np.int alias",
    },
    KnownIncompatibility {
        signature: "module 'numpy' has no attribute 'bool'",
        pin: "numpy==1.23.5",
        reason: "NumPy 1.24 removed the deprecated np.bool alias",
    },
    KnownIncompatibility {
        signature: "numpy.dtype size changed, may indicate binary incompatibility",
        pin: "numpy==1.26.4",
        reason: "extension modules built against NumPy 1.x break under NumPy 2",
    },
    KnownIncompatibility {
        signature: "module 'lib' has no attribute 'X509_V_FLAG_CB_ISSUER_CHECK'",
        pin: "pyOpenSSL==23.2.0",
        reason: "cryptography and old pyOpenSSL releases disagree on OpenSSL bindings",
    },
];

/// First known incompatibility whose signature occurs in `message`.
pub fn find_known_incompatibility(message: &str) -> Option<&'static KnownIncompatibility> {
    KNOWN_INCOMPATIBILITIES
        .iter()
        .find(|known| message.contains(known.signature))
}
