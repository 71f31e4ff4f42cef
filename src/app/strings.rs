//! User-facing text

pub const SPIN_IDLE: &str = "🎲 번호 생성하기";
pub const SPIN_BUSY: &str = "생성 중...";
pub const SAVE: &str = "💾 저장하기";
pub const SAVE_DUPLICATE: &str = "⚠️ 이미 저장됨";
pub const EMPTY_PLACEHOLDER: &str = "번호를 생성해주세요!";
pub const DOWNLOAD: &str = "📷 이미지 저장";
pub const DELETE_ALL: &str = "🗑️ 전체 삭제";

pub const TOAST_SAVED: &str = "✅ 번호가 저장되었습니다!";
pub const TOAST_DUPLICATE: &str = "⚠️ 이미 저장된 번호입니다!";
pub const TOAST_DELETED: &str = "🗑️ 모든 번호가 삭제되었습니다!";
pub const TOAST_NO_SETS: &str = "❌ 저장된 번호가 없습니다!";
pub const TOAST_IMAGE_FAILED: &str = "❌ 이미지 생성 실패";
pub const TOAST_DOWNLOADED: &str = "📥 로또 용지가 다운로드되었습니다!";

pub const DELETE_TITLE: &str = "정말 삭제하시겠습니까?";
pub const DELETE_BODY: &str = "저장된 모든 번호 세트가 삭제됩니다. 이 작업은 되돌릴 수 없습니다.";
pub const DELETE_CANCEL: &str = "취소";
pub const DELETE_CONFIRM: &str = "삭제하기";

/// Header caption with the saved count
pub fn saved_caption(count: usize) -> String {
    format!("📊 저장된 번호: {count}개 세트")
}

/// Retention note under the saved list
pub fn retention_note(days: u32) -> String {
    format!("💾 번호는 {days}일간 브라우저에 저장됩니다")
}
