/// 文档类别
///
/// 门户只提供两种报表，集合是封闭的。枚举顺序即下载顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    /// 工资单（contracheque）
    PaycheckReport,
    /// 补偿款（verbas indenizatórias）
    IndemnityReport,
}

impl DocumentCategory {
    /// 按下载顺序排列的全部类别
    pub const ALL: [DocumentCategory; 2] = [
        DocumentCategory::PaycheckReport,
        DocumentCategory::IndemnityReport,
    ];

    /// 报表类型下拉框（`#quadro`）中对应的选项值
    pub fn selection_id(self) -> &'static str {
        match self {
            DocumentCategory::PaycheckReport => "1",
            DocumentCategory::IndemnityReport => "6",
        }
    }

    /// 文件名前缀
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentCategory::PaycheckReport => "contracheque",
            DocumentCategory::IndemnityReport => "indenizatorias",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}
