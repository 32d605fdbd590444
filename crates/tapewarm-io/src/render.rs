//! Offline rendering of whole files through a tape machine.

use rand::RngCore;
use tapewarm_tape::TapeMachine;

/// Peak levels and sizes of one render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    /// Frames processed per channel.
    pub frames: usize,
    /// Blocks handed to the machine.
    pub blocks: usize,
    /// Largest input magnitude seen.
    pub input_peak: f32,
    /// Largest output magnitude produced.
    pub output_peak: f32,
}

/// Feeds per-channel buffers to a [`TapeMachine`] one block at a time.
pub struct RenderEngine<R: RngCore> {
    machine: TapeMachine<R>,
    block_size: usize,
}

impl<R: RngCore> RenderEngine<R> {
    /// Prepares `machine` for `block_size` (at least 1) at its current rate.
    pub fn new(mut machine: TapeMachine<R>, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        machine.prepare(machine.sample_rate(), block_size);
        Self {
            machine,
            block_size,
        }
    }

    /// Block size in frames.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The machine being driven.
    pub fn machine(&self) -> &TapeMachine<R> {
        &self.machine
    }

    /// Mutable access, for changing controls between renders.
    pub fn machine_mut(&mut self) -> &mut TapeMachine<R> {
        &mut self.machine
    }

    /// Gives the machine back.
    pub fn into_machine(self) -> TapeMachine<R> {
        self.machine
    }

    /// Processes `channels` in place.
    pub fn render(&mut self, channels: &mut [Vec<f32>]) -> RenderStats {
        self.render_with_progress(channels, |_, _| {})
    }

    /// Processes `channels` in place, calling `progress(done, total)` in
    /// frames after every block.
    pub fn render_with_progress<F>(
        &mut self,
        channels: &mut [Vec<f32>],
        mut progress: F,
    ) -> RenderStats
    where
        F: FnMut(usize, usize),
    {
        let total = channels.iter().map(Vec::len).min().unwrap_or(0);
        let mut stats = RenderStats::default();

        let mut start = 0;
        while start < total {
            let end = (start + self.block_size).min(total);
            let mut block: Vec<&mut [f32]> =
                channels.iter_mut().map(|ch| &mut ch[start..end]).collect();
            self.machine.process(&mut block);

            stats.input_peak = stats.input_peak.max(self.machine.input_level());
            stats.output_peak = stats.output_peak.max(self.machine.output_level());
            stats.blocks += 1;
            start = end;
            progress(start, total);
        }

        stats.frames = total;
        tracing::debug!(
            frames = stats.frames,
            blocks = stats.blocks,
            input_peak = stats.input_peak,
            output_peak = stats.output_peak,
            "render finished"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count_and_progress() {
        let machine = TapeMachine::with_seed(48000.0, 1);
        let mut engine = RenderEngine::new(machine, 100);
        let mut channels = vec![vec![0.25f32; 1050], vec![-0.25f32; 1050]];

        let mut calls = Vec::new();
        let stats = engine.render_with_progress(&mut channels, |done, total| {
            calls.push((done, total));
        });

        assert_eq!(stats.blocks, 11);
        assert_eq!(stats.frames, 1050);
        assert_eq!(calls.first(), Some(&(100, 1050)));
        assert_eq!(calls.last(), Some(&(1050, 1050)));
        assert_eq!(stats.input_peak, 0.25);
        assert!(stats.output_peak > 0.0);
    }

    #[test]
    fn test_matches_direct_processing() {
        let input: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();

        let mut engine = RenderEngine::new(TapeMachine::with_seed(44100.0, 9), 256);
        let mut rendered = vec![input.clone()];
        engine.render(&mut rendered);

        let mut direct = TapeMachine::with_seed(44100.0, 9);
        direct.prepare(44100.0, 256);
        let mut expected = input;
        for chunk in expected.chunks_mut(256) {
            direct.process(&mut [chunk]);
        }

        assert_eq!(rendered[0], expected);
    }

    #[test]
    fn test_zero_block_size_is_clamped() {
        let engine = RenderEngine::new(TapeMachine::with_seed(48000.0, 1), 0);
        assert_eq!(engine.block_size(), 1);
        assert_eq!(engine.machine().block_size(), 1);
    }
}
