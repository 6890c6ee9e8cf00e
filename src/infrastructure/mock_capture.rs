/// モックキャプチャアダプタ
///
/// テスト・開発用のフレームソース。単色の合成フレームを返すのみで、
/// 実際の画面キャプチャは行わない。

use crate::domain::{CapturePort, DomainResult, Frame};

/// モックキャプチャアダプタ
pub struct MockCaptureAdapter {
    width: u32,
    height: u32,
    frame_count: u64,
}

impl MockCaptureAdapter {
    /// 新しいモックキャプチャアダプタを作成
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_count: 0,
        }
    }

    /// 生成したフレーム数
    #[allow(dead_code)]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for MockCaptureAdapter {
    fn default() -> Self {
        // 判断エンジンのモックには縮小解像度で十分
        Self::new(480, 270)
    }
}

impl CapturePort for MockCaptureAdapter {
    fn capture_frame(&mut self) -> DomainResult<Option<Frame>> {
        self.frame_count += 1;

        // モック実装: 中間グレーのRGBAフレームを返す
        let data = vec![0x80u8; (self.width * self.height * 4) as usize];
        Ok(Some(Frame::new(data, self.width, self.height)))
    }
}
