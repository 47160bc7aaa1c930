use noughts_core::{Tone, ToneSink, Waveform};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{AudioContext, AudioContextState, OscillatorType};

#[derive(Error, Debug)]
pub(crate) enum AudioError {
    #[error("Could not create audio context: {0}")]
    Unavailable(String),
    #[error("Could not schedule tone: {0}")]
    Playback(String),
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

const fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

/// Web Audio output. The context is created on first use and kept for the page's lifetime.
#[derive(Debug, Default)]
pub(crate) struct WebAudio {
    context: Option<AudioContext>,
    // set asynchronously once a resume succeeds
    unlocked: Rc<Cell<bool>>,
}

impl WebAudio {
    fn ensure_context(&mut self) -> Result<&AudioContext, AudioError> {
        let context = match self.context.take() {
            Some(context) => context,
            None => {
                let context =
                    AudioContext::new().map_err(|err| AudioError::Unavailable(describe(err)))?;
                log::debug!("audio context created ({:?})", context.state());
                context
            }
        };
        Ok(self.context.insert(context))
    }

    /// Browsers only let audio start from inside a user gesture.
    pub(crate) fn unlock_from_gesture(&mut self) {
        if self.unlocked.get() {
            return;
        }
        let unlocked = self.unlocked.clone();
        match self.ensure_context() {
            Ok(context) => resume_if_needed(context, &unlocked),
            Err(err) => log::debug!("{}", err),
        }
        unlocked.set(true);
    }
}

fn resume_if_needed(context: &AudioContext, unlocked: &Rc<Cell<bool>>) {
    if context.state() != AudioContextState::Suspended {
        unlocked.set(true);
        return;
    }

    match context.resume() {
        Ok(promise) => {
            let unlocked = unlocked.clone();
            spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => {
                        log::debug!("audio context resumed");
                        unlocked.set(true);
                    }
                    Err(err) => log::debug!("audio context resume refused: {:?}", err),
                }
            });
        }
        Err(err) => log::debug!("audio context resume failed: {:?}", err),
    }
}

fn schedule(context: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
    let oscillator = context.create_oscillator()?;
    let gain = context.create_gain()?;

    oscillator.set_type(oscillator_type(tone.waveform));
    oscillator.frequency().set_value(tone.frequency_hz);
    oscillator.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&context.destination())?;
    gain.gain().set_value(Tone::START_GAIN);

    oscillator.start()?;
    let now = context.current_time();
    gain.gain()
        .exponential_ramp_to_value_at_time(Tone::END_GAIN, now + tone.duration.as_secs_f64())?;
    oscillator.stop_with_when(now + tone.lifetime().as_secs_f64())?;
    Ok(())
}

impl ToneSink for WebAudio {
    type Error = AudioError;

    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        let unlocked = self.unlocked.clone();
        let context = self.ensure_context()?;
        resume_if_needed(context, &unlocked);

        if !unlocked.get() && context.state() == AudioContextState::Suspended {
            log::trace!("audio still locked, dropping {:?}", tone);
            return Ok(());
        }

        log::trace!("tone {} Hz {:?}", tone.frequency_hz, tone.waveform);
        schedule(context, tone).map_err(|err| AudioError::Playback(describe(err)))
    }
}
