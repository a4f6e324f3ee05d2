//! Browser fingerprint patching: hide automation signals.

/// Identity presented to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    pub user_agent: String,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                .to_string(),
            webgl_vendor: "Intel Inc.".to_string(),
            webgl_renderer: "Intel Iris OpenGL Engine".to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
        }
    }
}

/// JavaScript that patches navigator.webdriver, chrome.runtime, plugins and languages.
const BASE_SCRIPT: &str = r#"
(() => {
    Object.defineProperty(navigator, 'webdriver', {
        get: () => false,
        configurable: true,
    });

    if (!window.chrome) {
        window.chrome = {};
    }
    if (!window.chrome.runtime) {
        window.chrome.runtime = {
            connect: function() {},
            sendMessage: function() {},
        };
    }

    const originalQuery = window.navigator.permissions.query;
    window.navigator.permissions.query = (parameters) =>
        parameters.name === 'notifications'
            ? Promise.resolve({ state: Notification.permission })
            : originalQuery(parameters);

    Object.defineProperty(navigator, 'plugins', {
        get: () => [1, 2, 3, 4, 5],
        configurable: true,
    });

    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en'],
        configurable: true,
    });
})();
"#;

/// Build the injection script for a fingerprint.
///
/// Adds a WebGL `getParameter` override reporting the configured
/// UNMASKED_VENDOR (37445) and UNMASKED_RENDERER (37446).
pub fn stealth_script(fp: &Fingerprint) -> String {
    let vendor = js_string(&fp.webgl_vendor);
    let renderer = js_string(&fp.webgl_renderer);
    format!(
        r#"{BASE_SCRIPT}
(() => {{
    const patch = (proto) => {{
        if (!proto) return;
        const getParameter = proto.getParameter;
        proto.getParameter = function(param) {{
            if (param === 37445) return {vendor};
            if (param === 37446) return {renderer};
            return getParameter.call(this, param);
        }};
    }};
    patch(window.WebGLRenderingContext && WebGLRenderingContext.prototype);
    patch(window.WebGL2RenderingContext && WebGL2RenderingContext.prototype);
}})();
"#
    )
}

/// Quote a value as a JS string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
