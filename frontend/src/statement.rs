//! 待上传的银行账单文件

use wasm_bindgen_futures::JsFuture;

const PDF_MIME: &str = "application/pdf";

/// 已读入内存的账单文件
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFile {
    pub name: String,
    /// 浏览器报告的 MIME 类型，可能为空
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    fn has_pdf_extension(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
    }

    /// MIME 为 `application/pdf`，或浏览器未给出 MIME 但扩展名为 `.pdf`
    pub fn is_pdf(&self) -> bool {
        if self.content_type.is_empty() {
            self.has_pdf_extension()
        } else {
            self.content_type.eq_ignore_ascii_case(PDF_MIME)
        }
    }

    /// 上传时使用的 MIME
    pub fn mime(&self) -> &str {
        if self.content_type.is_empty() && self.has_pdf_extension() {
            PDF_MIME
        } else {
            &self.content_type
        }
    }

    /// 读取浏览器 `File` 的内容
    pub async fn read(file: &web_sys::File) -> Result<Self, String> {
        let buffer = JsFuture::from(file.array_buffer())
            .await
            .map_err(|e| format!("读取文件失败: {:?}", e))?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        Ok(Self::new(file.name(), file.type_(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detection() {
        assert!(PdfFile::new("may.pdf", "application/pdf", vec![]).is_pdf());
        assert!(PdfFile::new("MAY.PDF", "", vec![]).is_pdf());
        assert!(!PdfFile::new("may.png", "image/png", vec![]).is_pdf());
        // 扩展名不能掩盖错误的 MIME
        assert!(!PdfFile::new("fake.pdf", "text/plain", vec![]).is_pdf());
        assert!(!PdfFile::new("notes", "", vec![]).is_pdf());
    }

    #[test]
    fn mime_falls_back_for_pdf_extension() {
        assert_eq!(PdfFile::new("a.pdf", "", vec![]).mime(), "application/pdf");
        assert_eq!(PdfFile::new("a.pdf", "application/pdf", vec![]).mime(), "application/pdf");
    }
}
