//! Page enhancement applied before navigation
//!
//! Job boards often sit behind bot filters that look at the viewport and a
//! handful of navigator properties. These overrides run on the blank page so
//! they are in place for the first document of the real navigation.

use anyhow::Result;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;

const NAVIGATOR_OVERRIDES_JS: &str = r"
    Object.defineProperty(navigator, 'webdriver', { get: () => false });
    Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
    if (!window.chrome) { window.chrome = {}; }
    if (!window.chrome.runtime) {
        window.chrome.runtime = {
            connect: () => ({
                onMessage: { addListener: () => {}, removeListener: () => {} },
                postMessage: () => {}
            })
        };
    }
";

/// Set a desktop viewport and install the navigator overrides.
pub async fn enhance_page(page: &Page) -> Result<()> {
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        NAVIGATOR_OVERRIDES_JS,
    ))
    .await?;

    // 1920x1080 for consistent desktop rendering
    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(1920)
            .height(1080)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    log::debug!("Page enhancements applied");
    Ok(())
}
