use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Locale used when a requested locale has no bundle
pub const DEFAULT_LOCALE: &str = "en";

/// Internationalization service using Fluent (thread-safe)
pub struct I18n {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_locale: String,
}

impl I18n {
    /// Create a new i18n service with the embedded English and Chinese translations
    pub fn new() -> Self {
        let mut i18n = Self {
            bundles: HashMap::new(),
            default_locale: DEFAULT_LOCALE.to_string(),
        };

        for (locale, content) in [("en", EN_TRANSLATIONS), ("zh-CN", ZH_CN_TRANSLATIONS)] {
            if let Err(e) = i18n.add_locale(locale, content) {
                warn!(locale = %locale, error = %e, "Failed to load embedded translations");
            }
        }

        i18n
    }

    /// Add a locale with translations
    pub fn add_locale(&mut self, locale: &str, content: &str) -> Result<(), String> {
        let lang_id: LanguageIdentifier = locale
            .parse()
            .map_err(|e| format!("Invalid locale '{}': {}", locale, e))?;

        let resource = FluentResource::try_new(content.to_string())
            .map_err(|(_, errors)| format!("Failed to parse Fluent resource: {:?}", errors))?;

        let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
        // File paths and extensions are shown verbatim
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| format!("Failed to add resource to bundle: {:?}", errors))?;

        self.bundles.insert(locale.to_string(), bundle);

        debug!(locale = %locale, "Loaded translations");

        Ok(())
    }

    /// Whether a bundle exists for the locale
    pub fn has_locale(&self, locale: &str) -> bool {
        self.bundles.contains_key(locale)
    }

    /// Get a translated message
    pub fn get(&self, locale: &str, key: &str, args: Option<&FluentArgs>) -> String {
        // Try requested locale, fall back to default, fall back to key
        self.try_get(locale, key, args)
            .or_else(|| self.try_get(&self.default_locale, key, args))
            .unwrap_or_else(|| key.to_string())
    }

    /// Try to get a translation from a specific locale
    fn try_get(&self, locale: &str, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(locale)?;
        let message = bundle.get_message(key)?;
        let pattern = message.value()?;

        let mut errors = vec![];
        let result = bundle.format_pattern(pattern, args, &mut errors);

        if !errors.is_empty() {
            warn!(key = %key, errors = ?errors, "Fluent formatting errors");
        }

        Some(result.to_string())
    }

    /// Get a translated message with arguments
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (k, v) in args {
            fluent_args.set(*k, *v);
        }
        self.get(locale, key, Some(&fluent_args))
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

const EN_TRANSLATIONS: &str = r#"
# Layout tool
tool-export-ready = The document has been analyzed. Click the file below to download it.
tool-error-missing-input = Error: no document path was provided
tool-error-file-not-found = Error: file does not exist - { $path }
tool-error-unsupported-type = Error: unsupported file type { $extension }, supported types: { $supported }
tool-error-missing-credentials = Error: Azure Document Intelligence credentials are not configured
tool-error-invalid-credentials = Error: invalid Azure Document Intelligence credentials
tool-error-service-unavailable = Error: Azure Document Intelligence service unavailable
tool-error-service = Error: Azure Document Intelligence service error - { $message }
tool-error-failure = Error: { $message }

# Credential validation
credential-validation-failed = Credential validation failed: { $reason }
credential-issue-missing = missing required credential information
credential-issue-invalid-endpoint = invalid endpoint format
credential-issue-invalid-key-format = invalid API key format
credential-issue-invalid-key = invalid API key
credential-issue-service-unavailable = service unavailable
credential-issue-service = service error: { $message }

# Health
health-status-ready = Service is ready
health-status-unconfigured = Service is running without Azure credentials
"#;

const ZH_CN_TRANSLATIONS: &str = r#"
# Layout tool
tool-export-ready = 文档已解析完成，请点击下方的文件进行下载。
tool-error-missing-input = 错误：未提供文档路径
tool-error-file-not-found = 错误：文件不存在 - { $path }
tool-error-unsupported-type = 错误：不支持的文件类型 { $extension }，支持的类型包括：{ $supported }
tool-error-missing-credentials = 错误：未配置Azure Document Intelligence凭证
tool-error-invalid-credentials = 错误：Azure Document Intelligence凭证无效
tool-error-service-unavailable = 错误：Azure Document Intelligence服务不可用
tool-error-service = 错误：Azure Document Intelligence服务错误 - { $message }
tool-error-failure = 错误：{ $message }

# Credential validation
credential-validation-failed = 凭证验证失败: { $reason }
credential-issue-missing = 缺少必要的凭证信息
credential-issue-invalid-endpoint = 无效的endpoint格式
credential-issue-invalid-key-format = 无效的API key格式
credential-issue-invalid-key = API key无效
credential-issue-service-unavailable = 服务不可用
credential-issue-service = 服务错误: { $message }

# Health
health-status-ready = 服务已就绪
health-status-unconfigured = 服务正在运行，但未配置Azure凭证
"#;
