//! Localized text report generator.

use crate::types::{DeviceReport, RootManager, RootReport, UNKNOWN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Lang {
    #[default]
    #[value(name = "zh")]
    Chinese,
    #[value(name = "ja")]
    Japanese,
}

impl Lang {
    /// Picks the language from the POSIX locale variables. Anything that is
    /// not Japanese gets the default.
    pub fn from_env() -> Self {
        let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .unwrap_or_default();
        Self::from_locale(&locale)
    }

    pub fn from_locale(locale: &str) -> Self {
        if locale.to_ascii_lowercase().starts_with("ja") {
            Lang::Japanese
        } else {
            Lang::Chinese
        }
    }

    pub fn root_marker(self) -> &'static str {
        self.labels().root_header
    }

    pub fn not_rooted_notice(self) -> &'static str {
        self.labels().not_rooted
    }

    pub fn theme_changed_notice(self) -> &'static str {
        self.labels().theme_changed
    }

    fn labels(self) -> &'static Labels {
        match self {
            Lang::Chinese => &ZH,
            Lang::Japanese => &JA,
        }
    }
}

struct Labels {
    brand: &'static str,
    model: &'static str,
    system: &'static str,
    arch: &'static str,
    recommended: &'static str,
    unknown: &'static str,
    root_header: &'static str,
    kernel: &'static str,
    manager: &'static str,
    selinux: &'static str,
    other: &'static str,
    zygisk: &'static str,
    ramdisk: &'static str,
    package: &'static str,
    yes: &'static str,
    no: &'static str,
    not_rooted: &'static str,
    theme_changed: &'static str,
}

const ZH: Labels = Labels {
    brand: "品牌",
    model: "型号",
    system: "系统版本",
    arch: "架构",
    recommended: "推荐 GSI",
    unknown: "未知",
    root_header: "=== Root 信息 ===",
    kernel: "内核版本",
    manager: "Root 管理器",
    selinux: "SELinux 状态",
    other: "其他",
    zygisk: "Zygisk",
    ramdisk: "Ramdisk",
    package: "Magisk 包名",
    yes: "是",
    no: "否",
    not_rooted: "设备未 Root",
    theme_changed: "主题已更改",
};

const JA: Labels = Labels {
    brand: "ブランド",
    model: "モデル",
    system: "システムバージョン",
    arch: "アーキテクチャ",
    recommended: "推奨 GSI",
    unknown: "不明",
    root_header: "=== Root 情報 ===",
    kernel: "カーネルバージョン",
    manager: "Root マネージャー",
    selinux: "SELinux 状態",
    other: "その他",
    zygisk: "Zygisk",
    ramdisk: "Ramdisk",
    package: "Magisk パッケージ",
    yes: "はい",
    no: "いいえ",
    not_rooted: "デバイスは Root 化されていません",
    theme_changed: "テーマを変更しました",
};

fn localize<'a>(value: &'a str, labels: &'a Labels) -> &'a str {
    if value == UNKNOWN {
        labels.unknown
    } else {
        value
    }
}

pub fn render_device(report: &DeviceReport, lang: Lang) -> String {
    let l = lang.labels();
    let layout = if report.is_ab_partition { "(AB)" } else { "(A-only)" };

    let mut out = String::new();
    out.push_str(&format!("{}：{}\n", l.brand, localize(&report.brand, l)));
    out.push_str(&format!("{}：{}\n", l.model, localize(&report.model, l)));
    out.push_str(&format!(
        "{}：Android {} (SDK {})\n",
        l.system,
        localize(&report.os_release, l),
        report.sdk_level
    ));
    out.push_str(&format!("VNDK：{}\n", localize(&report.vndk_version, l)));
    out.push_str(&format!("First API：{}\n", localize(&report.first_api_level, l)));
    out.push_str(&format!("{}：{} {}\n", l.arch, report.abi, layout));
    out.push('\n');
    out.push_str(&format!("{}：\n", l.recommended));
    out.push_str(&report.recommended_gsi_url);
    out
}

pub fn render_root(root: &RootReport, lang: Lang) -> String {
    let l = lang.labels();
    let manager = match &root.root_manager {
        RootManager::Magisk => "Magisk".to_string(),
        RootManager::KernelSU => "KernelSU".to_string(),
        RootManager::SuperSU => "SuperSU".to_string(),
        RootManager::Other(path) => format!("{} ({})", l.other, path),
        RootManager::Unknown => l.unknown.to_string(),
    };
    let flag = |value: Option<bool>| match value {
        Some(true) => l.yes,
        Some(false) => l.no,
        None => l.unknown,
    };

    let mut out = format!("{}\n", l.root_header);
    out.push_str(&format!("{}：{}\n", l.kernel, localize(&root.kernel_version, l)));
    out.push_str(&format!("{}：{}\n", l.manager, manager));
    out.push_str(&format!("{}：{}", l.selinux, localize(&root.selinux_mode, l)));
    if let Some(magisk) = &root.magisk {
        out.push_str(&format!(
            "\nMagisk {} ({})",
            localize(&magisk.version_name, l),
            localize(&magisk.version_code, l)
        ));
        out.push_str(&format!("\n{}：{}", l.zygisk, flag(magisk.zygisk_enabled)));
        out.push_str(&format!("\n{}：{}", l.ramdisk, flag(magisk.ramdisk_present)));
        out.push_str(&format!("\n{}：{}", l.package, magisk.package_name));
    }
    out
}

/// Appends the root section to `rendered`, or `None` if one is already there.
pub fn append_root(rendered: &str, root: &RootReport, lang: Lang) -> Option<String> {
    if rendered.contains(lang.root_marker()) {
        return None;
    }
    Some(format!("{}\n\n{}", rendered, render_root(root, lang)))
}
