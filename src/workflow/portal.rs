//! 门户页面元素
//!
//! 门户没有 API，这些选择器来自对页面结构的观察，页面改版时需要同步更新。

use crate::infrastructure::Selector;

/// "薪酬"页签
pub const REPORTS_TAB: Selector = Selector::XPath(r#"//*[@id="tab6"]/div/div/ul[2]/li[2]/a"#);

/// 月份下拉框
pub const MONTH_FIELD: Selector = Selector::Css("#mes");

/// 年份下拉框
pub const YEAR_FIELD: Selector = Selector::Css("#ano");

/// 报表类型下拉框
pub const REPORT_TYPE_FIELD: Selector = Selector::Css("#quadro");

/// "生成表格"按钮
pub const EMIT_WORKSHEET_BUTTON: Selector = Selector::XPath(
    "/html/body/div[1]/div/div/section[2]/div/div/div[6]/div/div/div/div/div/div/div[2]/form/button",
);

/// 生成后出现的下载链接
pub const DOWNLOAD_ANCHOR: Selector = Selector::XPath("/html/body/a[1]");
