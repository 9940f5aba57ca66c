//! Assembly timeline planning
//!
//! Resolves an ordered shot list and a set of audio layers into a concrete
//! timeline: absolute shot placements, one transition decision per
//! junction, and the audio mix plan. Pure function of its inputs; planning
//! the same shot list twice yields a bit-identical timeline.

use cede_common::{Error, Result, TransitionParams};
use tracing::debug;

use crate::models::{
    AssemblyTimeline, AudioLayer, PlacedShot, ShotSpec, TransitionDecision, TransitionKind,
};

/// Multi-clip assembly planner
pub struct AssemblyPlanner {
    params: TransitionParams,
}

impl AssemblyPlanner {
    pub fn new(params: TransitionParams) -> Self {
        Self { params }
    }

    /// Plan a timeline for an ordered shot list
    ///
    /// `audio_layers` are placed at their own start times; `video_volume`
    /// scales the video track's embedded audio. Shot starts are the running
    /// sum of trimmed durations, minus any crossfade overlap consumed at
    /// the previous junction; black inserts push the following shot later.
    pub fn plan_assembly(
        &self,
        shots: &[ShotSpec],
        audio_layers: &[AudioLayer],
        video_volume: f64,
    ) -> Result<AssemblyTimeline> {
        if shots.is_empty() {
            return Err(Error::InvalidParameter(
                "assembly requires at least one shot".into(),
            ));
        }
        if !(0.0..=1.0).contains(&video_volume) {
            return Err(Error::InvalidParameter(format!(
                "video volume {} outside [0, 1]",
                video_volume
            )));
        }
        for (i, shot) in shots.iter().enumerate() {
            if !(0.0..=1.0).contains(&shot.energy) || !(0.0..=1.0).contains(&shot.tension) {
                return Err(Error::InvalidParameter(format!(
                    "shot {} energy/tension outside [0, 1]",
                    i
                )));
            }
            if shot.trimmed_duration() <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "shot {} has non-positive trimmed duration",
                    i
                )));
            }
        }
        for layer in audio_layers {
            if !(0.0..=1.0).contains(&layer.volume) {
                return Err(Error::InvalidParameter(format!(
                    "audio layer volume {} outside [0, 1]",
                    layer.volume
                )));
            }
        }

        let mut transitions = Vec::with_capacity(shots.len().saturating_sub(1));
        for pair in shots.windows(2) {
            transitions.push(self.decide_transition(&pair[0], &pair[1]));
        }

        let mut placed = Vec::with_capacity(shots.len());
        let mut cursor = 0.0_f64;
        for (i, shot) in shots.iter().enumerate() {
            if i > 0 {
                let transition = &transitions[i - 1];
                match transition.kind {
                    // Crossfade overlaps the junction: this shot starts
                    // before the previous one ends.
                    TransitionKind::Crossfade => cursor -= transition.duration_seconds,
                    // A black insert sits between the shots.
                    TransitionKind::BlackInsert => cursor += transition.duration_seconds,
                    TransitionKind::HardCut => {}
                }
            }
            let start = cursor;
            let end = start + shot.trimmed_duration();
            placed.push(PlacedShot {
                shot_index: i,
                video_path: shot.video_path.clone(),
                start,
                end,
            });
            cursor = end;
        }

        let video_end = placed.last().map(|s| s.end).unwrap_or(0.0);
        let audio_end = audio_layers
            .iter()
            .map(AudioLayer::end_time)
            .fold(0.0_f64, f64::max);
        let total_duration = video_end.max(audio_end);

        debug!(
            shots = shots.len(),
            transitions = transitions.len(),
            layers = audio_layers.len(),
            total_duration,
            "assembly planned"
        );

        Ok(AssemblyTimeline {
            shots: placed,
            transitions,
            audio_mix: audio_layers.to_vec(),
            video_volume,
            total_duration,
        })
    }

    /// Decide the transition into `next`
    ///
    /// Rules are evaluated in fixed order; the first match wins:
    /// 1. `skip_transition` on the incoming shot forces a hard cut
    ///    (stitching continuation takes of one shot).
    /// 2. High-to-low tension release: crossfade.
    /// 3. Low-to-high build into a spike: black insert.
    /// 4. Sustained intensity on both sides: hard cut.
    /// 5. Default: hard cut.
    fn decide_transition(&self, prev: &ShotSpec, next: &ShotSpec) -> TransitionDecision {
        if next.skip_transition {
            return TransitionDecision::hard_cut();
        }
        let p = &self.params;
        if prev.tension >= p.tension_high && next.tension <= p.tension_low {
            // The overlap cannot consume more than either adjacent shot,
            // otherwise the next shot would be placed before time zero.
            let duration_seconds = p
                .crossfade_duration
                .min(prev.trimmed_duration())
                .min(next.trimmed_duration());
            return TransitionDecision {
                kind: TransitionKind::Crossfade,
                duration_seconds,
            };
        }
        if prev.tension <= p.tension_low && next.tension >= p.tension_high {
            return TransitionDecision {
                kind: TransitionKind::BlackInsert,
                duration_seconds: p.black_insert_duration,
            };
        }
        if prev.tension >= p.tension_sustained && next.tension >= p.tension_sustained {
            return TransitionDecision::hard_cut();
        }
        TransitionDecision::hard_cut()
    }
}

impl Default for AssemblyPlanner {
    fn default() -> Self {
        Self::new(TransitionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioLayerKind;
    use std::path::PathBuf;

    fn shot(tension: f64, duration: f64) -> ShotSpec {
        ShotSpec {
            video_path: PathBuf::from("/clips/shot.mp4"),
            source_duration: duration,
            trim_start: None,
            trim_end: None,
            energy: 0.5,
            tension,
            mood: None,
            skip_transition: false,
        }
    }

    fn transition_for(a: f64, b: f64) -> TransitionDecision {
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(a, 4.0), shot(b, 4.0)], &[], 1.0)
            .unwrap();
        plan.transitions[0]
    }

    #[test]
    fn test_tension_release_crossfades() {
        let t = transition_for(0.8, 0.2);
        assert_eq!(t.kind, TransitionKind::Crossfade);
        assert_eq!(t.duration_seconds, 1.0);
    }

    #[test]
    fn test_tension_spike_black_insert() {
        let t = transition_for(0.2, 0.9);
        assert_eq!(t.kind, TransitionKind::BlackInsert);
        assert_eq!(t.duration_seconds, 0.3);
    }

    #[test]
    fn test_sustained_intensity_hard_cut() {
        let t = transition_for(0.75, 0.65);
        assert_eq!(t.kind, TransitionKind::HardCut);
        assert_eq!(t.duration_seconds, 0.0);
    }

    #[test]
    fn test_default_hard_cut() {
        let t = transition_for(0.5, 0.5);
        assert_eq!(t.kind, TransitionKind::HardCut);
    }

    #[test]
    fn test_skip_transition_forces_hard_cut() {
        let mut b = shot(0.2, 4.0);
        b.skip_transition = true;
        // Without the flag this pair would crossfade.
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.8, 4.0), b], &[], 1.0)
            .unwrap();
        assert_eq!(plan.transitions[0].kind, TransitionKind::HardCut);
    }

    #[test]
    fn test_crossfade_clamped_to_shorter_shot() {
        // A 0.5s shot cannot absorb the full 1.0s crossfade; the overlap
        // shrinks so the next shot still starts at a non-negative time.
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.8, 0.5), shot(0.2, 4.0)], &[], 1.0)
            .unwrap();
        assert_eq!(plan.transitions[0].kind, TransitionKind::Crossfade);
        assert_eq!(plan.transitions[0].duration_seconds, 0.5);
        assert_eq!(plan.shots[1].start, 0.0);
        assert!(plan.shots.iter().all(|s| s.start >= 0.0));
        assert_eq!(plan.total_duration, 4.0);
    }

    #[test]
    fn test_crossfade_overlap_consumed() {
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.8, 4.0), shot(0.2, 4.0)], &[], 1.0)
            .unwrap();
        // Second shot starts 1.0s before the first ends.
        assert_eq!(plan.shots[0].start, 0.0);
        assert_eq!(plan.shots[0].end, 4.0);
        assert_eq!(plan.shots[1].start, 3.0);
        assert_eq!(plan.shots[1].end, 7.0);
        assert_eq!(plan.total_duration, 7.0);
    }

    #[test]
    fn test_black_insert_pushes_next_shot() {
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.2, 4.0), shot(0.9, 4.0)], &[], 1.0)
            .unwrap();
        assert_eq!(plan.shots[1].start, 4.3);
        assert_eq!(plan.total_duration, 8.3);
    }

    #[test]
    fn test_trimmed_durations_accumulate() {
        let mut a = shot(0.5, 8.0);
        a.trim_start = Some(0.5);
        a.trim_end = Some(6.5);
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[a, shot(0.5, 4.0)], &[], 1.0)
            .unwrap();
        assert_eq!(plan.shots[0].end, 6.0);
        assert_eq!(plan.shots[1].start, 6.0);
        assert_eq!(plan.shots[1].end, 10.0);
    }

    #[test]
    fn test_audio_layers_extend_total_duration() {
        let music = AudioLayer {
            kind: AudioLayerKind::Music,
            path: Some(PathBuf::from("/audio/theme.mp3")),
            text: None,
            volume: 0.6,
            start_time: 0.0,
            duration: Some(12.0),
        };
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.5, 4.0)], &[music.clone()], 0.8)
            .unwrap();
        assert_eq!(plan.total_duration, 12.0);
        assert_eq!(plan.video_volume, 0.8);
        assert_eq!(plan.audio_mix, vec![music]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let shots = vec![shot(0.8, 4.0), shot(0.2, 3.0), shot(0.9, 5.0)];
        let planner = AssemblyPlanner::default();
        let a = planner.plan_assembly(&shots, &[], 1.0).unwrap();
        let b = planner.plan_assembly(&shots, &[], 1.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.transitions, b.transitions);
    }

    #[test]
    fn test_empty_shot_list_rejected() {
        let err = AssemblyPlanner::default()
            .plan_assembly(&[], &[], 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_out_of_range_tension_rejected() {
        let err = AssemblyPlanner::default()
            .plan_assembly(&[shot(1.5, 4.0)], &[], 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_out_of_range_video_volume_rejected() {
        let err = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.5, 4.0)], &[], 1.2)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_single_shot_has_no_transitions() {
        let plan = AssemblyPlanner::default()
            .plan_assembly(&[shot(0.5, 4.0)], &[], 1.0)
            .unwrap();
        assert!(plan.transitions.is_empty());
        assert_eq!(plan.total_duration, 4.0);
    }
}
