//! Derives the CSS and script payload for the hosted page from the settings
//! record and applies it to a live document.
//!
//! Selectors target markup the shell does not control, so every fragment is
//! best-effort: a fragment that stops matching simply does nothing.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{settings::Settings, BRAND_NAME, ORIGINAL_BRAND_NAME};

const STYLE_ELEMENT_ID: &str = "perlient-style";
const HIDDEN_MARKER_ATTRIBUTE: &str = "data-perlient-hidden";

pub(crate) const SIDEBAR_CSS: &str = r#"
/* perlient: sidebar */
aside[class*="sidebar"]:not([class*="main"]):not([class*="content"]),
nav[class*="sidebar"]:not([class*="main"]):not([class*="content"]),
div[class*="Sidebar"]:not([class*="main"]):not([class*="content"]):not([class*="Main"]),
[data-testid*="sidebar"]:not([data-testid*="main"]),
[aria-label*="sidebar" i]:not([aria-label*="main" i]) {
  display: none !important;
  visibility: hidden !important;
}
main:not([class*="sidebar"]):not([class*="nav"]),
[role="main"]:not([class*="sidebar"]):not([class*="nav"]),
[class*="main-content"]:not([class*="sidebar"]):not([class*="nav"]),
[class*="MainContent"]:not([class*="Sidebar"]):not([class*="Nav"]) {
  margin-left: 0 !important;
  padding-left: 0 !important;
  max-width: 100% !important;
}
"#;

pub(crate) const NAVIGATION_CSS: &str = r#"
/* perlient: navigation */
a[href*="/home"]:not([href*="/homepage"]),
a[href*="/discover"],
button[aria-label*="menu" i]:not([aria-label*="main" i]),
nav a[href*="/home"],
nav a[href*="/discover"] {
  display: none !important;
}
"#;

pub(crate) const BANNER_CSS: &str = r#"
/* perlient: banners */
[class*="comet" i]:not([class*="main"]):not([class*="content"]):not([class*="message"]):not([class*="chat"]),
[id*="comet" i]:not([id*="main"]):not([id*="content"]):not([id*="message"]),
[class*="banner" i]:not([class*="main"]):not([class*="content"]):not([class*="message"]),
[class*="promo" i]:not([class*="main"]):not([class*="content"]):not([class*="promote"]),
[data-testid*="banner" i]:not([data-testid*="main"]):not([data-testid*="content"]),
[data-testid*="promo" i]:not([data-testid*="main"]):not([data-testid*="content"]),
[aria-label*="comet" i]:not([aria-label*="main" i]):not([aria-label*="content" i]),
[aria-label*="assistant" i]:not([aria-label*="main" i]):not([aria-label*="content" i]):not([aria-label*="chat" i]) {
  display: none !important;
}
"#;

pub(crate) const AD_CSS: &str = r#"
/* perlient: ads */
[class*="ad-container" i]:not([class*="add"]):not([class*="advance"]):not([class*="adapter"]):not([class*="main"]):not([class*="content"]),
[class*="ad-wrapper" i]:not([class*="main"]):not([class*="content"]):not([class*="message"]),
[id*="ad-container" i]:not([id*="add"]):not([id*="main"]):not([id*="content"]),
[class*="advertisement" i]:not([class*="main"]):not([class*="content"]):not([class*="message"]),
[class*="sponsor-banner" i]:not([class*="sponsor-content"]):not([class*="main"]):not([class*="content"]),
iframe[src*="doubleclick"],
iframe[src*="googlesyndication"] {
  display: none !important;
}
"#;

/// Appended last so it wins over the hide rules at equal specificity.
pub(crate) const CONTENT_PROTECTION_CSS: &str = r#"
/* perlient: content protection */
main:not([data-perlient-hidden]),
[role="main"]:not([data-perlient-hidden]),
[class*="main-content"]:not([data-perlient-hidden]):not([class*="sidebar"]),
[class*="MainContent"]:not([data-perlient-hidden]):not([class*="Sidebar"]),
[class*="chat"]:not([data-perlient-hidden]),
[class*="Chat"]:not([data-perlient-hidden]),
[class*="message"]:not([data-perlient-hidden]),
[class*="Message"]:not([data-perlient-hidden]),
[class*="conversation"]:not([data-perlient-hidden]),
[class*="Conversation"]:not([data-perlient-hidden]) {
  display: block !important;
  visibility: visible !important;
  opacity: 1 !important;
}
"#;

const TEXT_REPLACEMENT_BODY: &str = r#"
  if (!document.body) return;
  var pattern = new RegExp(ORIGINAL, 'gi');
  var replaceText = function (node) {
    try {
      if (!node) return;
      if (node.nodeType === Node.TEXT_NODE) {
        if (node.textContent && pattern.test(node.textContent)) {
          pattern.lastIndex = 0;
          node.textContent = node.textContent.replace(pattern, REPLACEMENT);
        }
        pattern.lastIndex = 0;
      } else if (node.childNodes) {
        node.childNodes.forEach(replaceText);
      }
    } catch (e) {}
  };
  replaceText(document.body);
  if (!window.MutationObserver) return;
  new MutationObserver(function (mutations) {
    mutations.forEach(function (mutation) {
      mutation.addedNodes.forEach(function (node) {
        if (node.nodeType === Node.ELEMENT_NODE || node.nodeType === Node.TEXT_NODE) {
          replaceText(node);
        }
      });
    });
  }).observe(document.body, { childList: true, subtree: true });
"#;

const SIDEBAR_WATCHER_BODY: &str = r#"
  if (!document.body) return;
  var selectors = [
    'aside[class*="sidebar"]',
    'nav[class*="sidebar"]',
    '[class*="Sidebar"]:not([class*="Main"])',
    '[data-testid*="sidebar"]'
  ];
  var hideSidebar = function () {
    selectors.forEach(function (selector) {
      document.querySelectorAll(selector).forEach(function (el) {
        try {
          if (el.getAttribute(MARKER) === 'true') return;
          var classes = String(el.className || '');
          var isMainContent = classes.includes('main') || classes.includes('content') ||
            el.closest('[class*="main"]') || el.closest('[class*="content"]');
          if (isMainContent) return;
          el.style.cssText = 'display: none !important; visibility: hidden !important;';
          el.setAttribute(MARKER, 'true');
        } catch (e) {}
      });
    });
  };
  hideSidebar();
  setInterval(function () { try { hideSidebar(); } catch (e) {} }, 1000);
  if (window.MutationObserver) {
    new MutationObserver(function () { try { hideSidebar(); } catch (e) {} })
      .observe(document.body, { childList: true, subtree: true });
  }
"#;

const BANNER_WATCHER_BODY: &str = r#"
  if (!document.body) return;
  var isContent = function (el) {
    var classes = String(el.className || '');
    return ['main', 'content', 'message', 'chat', 'conversation'].some(function (word) {
      return classes.includes(word);
    });
  };
  var isBannerText = function (text) {
    return text.includes('Comet Assistant') || text.includes('Get AI Power') ||
      (text.includes('browser with') && text.includes('Comet'));
  };
  var hideBanners = function () {
    document.querySelectorAll('div, section, aside, header, article, footer').forEach(function (el) {
      try {
        if (el.getAttribute(MARKER) === 'true' || isContent(el)) return;
        if (el.closest('[class*="main"], [class*="content"], [class*="chat"]')) return;
        if (el.children.length > 12 || !isBannerText(el.textContent || '')) return;
        el.style.cssText = 'display: none !important; visibility: hidden !important;';
        el.setAttribute(MARKER, 'true');
      } catch (e) {}
    });
  };
  hideBanners();
  setInterval(function () { try { hideBanners(); } catch (e) {} }, 1000);
  if (window.MutationObserver) {
    new MutationObserver(function () { try { hideBanners(); } catch (e) {} })
      .observe(document.body, { childList: true, subtree: true });
  }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Installer {
    TextReplacement,
    SidebarWatcher,
    BannerWatcher,
}

impl Installer {
    pub(crate) const ALL: [Installer; 3] = [
        Installer::TextReplacement,
        Installer::SidebarWatcher,
        Installer::BannerWatcher,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Installer::TextReplacement => "text replacement",
            Installer::SidebarWatcher => "sidebar watcher",
            Installer::BannerWatcher => "banner watcher",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Installer::TextReplacement => TEXT_REPLACEMENT_BODY,
            Installer::SidebarWatcher => SIDEBAR_WATCHER_BODY,
            Installer::BannerWatcher => BANNER_WATCHER_BODY,
        }
    }

    pub(crate) fn script(self) -> String {
        guarded_script(self.name(), self.body())
    }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

// Every fragment runs in its own function scope and swallows its own errors.
fn guarded_script(name: &str, body: &str) -> String {
    format!(
        "(function () {{\n  var ORIGINAL = {original};\n  var REPLACEMENT = {replacement};\n  var MARKER = {marker};\n  try {{{body}  }} catch (e) {{\n    console.warn('{brand}: {name} failed', e);\n  }}\n}})();\n",
        original = js_string(ORIGINAL_BRAND_NAME),
        replacement = js_string(BRAND_NAME),
        marker = js_string(HIDDEN_MARKER_ATTRIBUTE),
        brand = BRAND_NAME,
    )
}

pub(crate) fn title_script() -> String {
    guarded_script(
        "title",
        &format!(
            "\n  if (document && document.title !== {brand}) {{ document.title = {brand}; }}\n",
            brand = js_string(BRAND_NAME)
        ),
    )
}

/// Writes `css` into a single shell-owned `<style>` element, replacing
/// whatever an earlier call put there.
pub(crate) fn style_script(css: &str) -> String {
    guarded_script(
        "style",
        &format!(
            r#"
  var id = {id};
  var el = document.getElementById(id);
  if (!el) {{
    el = document.createElement('style');
    el.id = id;
    (document.head || document.documentElement).appendChild(el);
  }}
  if (el.textContent !== {css}) {{ el.textContent = {css}; }}
"#,
            id = js_string(STYLE_ELEMENT_ID),
            css = js_string(css),
        ),
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct InjectionPayload {
    pub(crate) css: String,
    pub(crate) title_script: String,
    pub(crate) installers: Vec<Installer>,
}

impl InjectionPayload {
    pub(crate) fn is_empty(&self) -> bool {
        self.css.is_empty() && self.title_script.is_empty() && self.installers.is_empty()
    }
}

pub(crate) fn derive_css(settings: &Settings) -> String {
    let mut css = String::new();
    if settings.hide_sidebar {
        css.push_str(SIDEBAR_CSS);
    }
    if settings.hide_navigation {
        css.push_str(NAVIGATION_CSS);
    }
    if settings.hide_banner || settings.block_ads {
        css.push_str(BANNER_CSS);
    }
    if settings.block_ads {
        css.push_str(AD_CSS);
    }
    if settings.has_custom_css() {
        css.push('\n');
        css.push_str(&settings.custom_css);
        css.push('\n');
    }
    css.push_str(CONTENT_PROTECTION_CSS);
    css
}

pub(crate) fn derive_payload(settings: &Settings) -> InjectionPayload {
    if settings.disable_all || !(settings.any_feature_enabled() || settings.has_custom_css()) {
        return InjectionPayload::default();
    }

    let installers = Installer::ALL
        .into_iter()
        .filter(|installer| match installer {
            Installer::TextReplacement => settings.replace_text,
            Installer::SidebarWatcher => settings.hide_sidebar,
            Installer::BannerWatcher => settings.hide_banner,
        })
        .collect();

    InjectionPayload {
        css: derive_css(settings),
        title_script: title_script(),
        installers,
    }
}

/// The one thing the applicator needs from a live page.
pub(crate) trait DocumentHandle {
    fn eval(&self, script: &str) -> Result<(), String>;
}

impl<R: tauri::Runtime> DocumentHandle for tauri::Webview<R> {
    fn eval(&self, script: &str) -> Result<(), String> {
        tauri::Webview::eval(self, script).map_err(|error| error.to_string())
    }
}

impl<R: tauri::Runtime> DocumentHandle for tauri::WebviewWindow<R> {
    fn eval(&self, script: &str) -> Result<(), String> {
        tauri::WebviewWindow::eval(self, script).map_err(|error| error.to_string())
    }
}

/// Which one-shot installers already ran in the current page session.
#[derive(Debug, Default)]
pub(crate) struct InstallState {
    text_replacement: AtomicBool,
    sidebar_watcher: AtomicBool,
    banner_watcher: AtomicBool,
}

impl InstallState {
    fn flag(&self, installer: Installer) -> &AtomicBool {
        match installer {
            Installer::TextReplacement => &self.text_replacement,
            Installer::SidebarWatcher => &self.sidebar_watcher,
            Installer::BannerWatcher => &self.banner_watcher,
        }
    }

    pub(crate) fn try_claim(&self, installer: Installer) -> Option<InstallClaim<'_>> {
        let flag = self.flag(installer);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(InstallClaim {
            flag,
            committed: false,
        })
    }

    #[cfg(test)]
    pub(crate) fn is_installed(&self, installer: Installer) -> bool {
        self.flag(installer).load(Ordering::Acquire)
    }

    pub(crate) fn reset(&self) {
        for installer in Installer::ALL {
            self.flag(installer).store(false, Ordering::Release);
        }
    }
}

/// Holds an installer's flag; releases it on drop unless committed.
pub(crate) struct InstallClaim<'a> {
    flag: &'a AtomicBool,
    committed: bool,
}

impl InstallClaim<'_> {
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for InstallClaim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.flag.store(false, Ordering::Release);
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConfigApplicator {
    install_state: InstallState,
    document_ready: AtomicBool,
}

impl ConfigApplicator {
    #[cfg(test)]
    pub(crate) fn install_state(&self) -> &InstallState {
        &self.install_state
    }

    /// A new document replaced the previous one; its observers are gone and
    /// it has no body yet.
    pub(crate) fn begin_session(&self) {
        self.document_ready.store(false, Ordering::Release);
        self.install_state.reset();
    }

    /// The current document finished loading; installers may run from now on.
    pub(crate) fn mark_document_ready(&self) {
        self.document_ready.store(true, Ordering::Release);
    }

    pub(crate) fn is_document_ready(&self) -> bool {
        self.document_ready.load(Ordering::Acquire)
    }

    pub(crate) fn apply<D>(&self, settings: &Settings, document: &D)
    where
        D: DocumentHandle + ?Sized,
    {
        let payload = derive_payload(settings);
        if payload.is_empty() {
            return;
        }

        if let Err(error) = document.eval(&style_script(&payload.css)) {
            log::warn!("failed to inject page style: {error}");
        }
        if let Err(error) = document.eval(&payload.title_script) {
            log::debug!("failed to set page title: {error}");
        }

        // installer scripts bail out without a body, so an eval now would
        // claim them for nothing
        if !self.is_document_ready() {
            log::debug!("document still loading, deferring installers");
            return;
        }

        for installer in payload.installers {
            let Some(claim) = self.install_state.try_claim(installer) else {
                continue;
            };
            match document.eval(&installer.script()) {
                Ok(()) => {
                    claim.commit();
                    log::debug!("installed {} for this page", installer.name());
                }
                Err(error) => {
                    log::warn!("failed to install {}: {error}", installer.name());
                }
            }
        }
    }
}
