//! Internationalization (i18n) module.
//!
//! Provides localized strings for CLI help and user-facing output.
//! English is the default language; Spanish is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `EMLVIEW_LANG`, `LC_MESSAGES` or `LANG`.
pub fn detect_system_lang() -> Lang {
    ["EMLVIEW_LANG", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(app_name, "emlview", "emlview");
msg!(
    app_about,
    "emlview \u{2014} Convert a .eml message into an HTML file and open it in your browser.",
    "emlview \u{2014} Convierte un mensaje .eml en un fichero HTML y lo abre en tu navegador."
);
msg!(
    app_long_about,
    "emlview \u{2014} Convert a .eml message into an HTML file.\nThe header fields are shown above the decoded base64 body,\nand the result is opened in your default browser.",
    "emlview \u{2014} Convierte un mensaje .eml en un fichero HTML.\nLos campos de cabecera se muestran sobre el cuerpo base64 decodificado\ny el resultado se abre en tu navegador por defecto."
);
msg!(
    app_after_help,
    "Configuration: $EMLVIEW_CONFIG or ~/.config/emlview/config.toml",
    "Configuraci\u{f3}n: $EMLVIEW_CONFIG o ~/.config/emlview/config.toml"
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_file_arg,
    ".eml file to convert",
    "Fichero .eml a convertir"
);
msg!(
    help_output,
    "Output filename (default: input name with .html, in the current directory)",
    "Nombre del fichero de salida (por defecto: nombre de entrada con .html, en el directorio actual)"
);
msg!(
    help_suppress,
    "Suppress the automatic browser launch",
    "No abrir el navegador autom\u{e1}ticamente"
);
msg!(
    help_delete,
    "Delete the HTML file once launched",
    "Borrar el fichero HTML una vez abierto"
);
msg!(
    help_delay,
    "Seconds to wait before deleting (with --d)",
    "Segundos de espera antes de borrar (con --d)"
);
msg!(help_version, "Print version", "Mostrar versi\u{f3}n");
msg!(
    help_verbose,
    "Verbose logging (repeat for debug and trace)",
    "Registro detallado (repetir para debug y trace)"
);
msg!(
    help_lang,
    "Language (en, es). Defaults to system locale",
    "Idioma (en, es). Por defecto usa el idioma del sistema"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar completions para tu shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);
msg!(
    help_cmd_config,
    "Show the configuration file location",
    "Mostrar la ubicaci\u{f3}n del fichero de configuraci\u{f3}n"
);
msg!(
    help_config_init,
    "Write the default configuration file",
    "Escribir el fichero de configuraci\u{f3}n por defecto"
);

// ── Conversion output ────────────────────────────────────────────

msg!(
    msg_success,
    "Success! Email contents written to",
    "\u{a1}Hecho! Contenido del correo escrito en"
);
msg!(
    msg_browser_failed,
    "Could not open a browser",
    "No se pudo abrir el navegador"
);
msg!(msg_removed, "Removed", "Borrado");
msg!(
    msg_remove_failed,
    "Could not remove the generated file",
    "No se pudo borrar el fichero generado"
);
msg!(msg_config_file, "Config file", "Fichero de configuraci\u{f3}n");
msg!(msg_log_file, "Log file", "Fichero de registro");
msg!(
    msg_config_written,
    "Default configuration written to",
    "Configuraci\u{f3}n por defecto escrita en"
);
msg!(
    msg_config_ignored,
    "Ignoring config file, using defaults",
    "Se ignora el fichero de configuraci\u{f3}n, se usan los valores por defecto"
);
msg!(msg_not_found, "(not found)", "(no encontrado)");

// ── Errors ───────────────────────────────────────────────────────

msg!(
    err_no_config_dir,
    "Could not determine the configuration directory",
    "No se pudo determinar el directorio de configuraci\u{f3}n"
);
