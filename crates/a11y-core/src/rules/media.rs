//! Captions and descriptions for embedded media.

use scraper::ElementRef;

use super::{wcag_url, Rule};
use crate::document::{node_for, Document};
use crate::model::{Issue, Severity};

pub struct MediaCaptions;

impl Rule for MediaCaptions {
    fn id(&self) -> &'static str {
        "media-captions"
    }

    fn summary(&self) -> &'static str {
        "Video has captions and audio descriptions, audio has a transcript track"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for media in doc.elements_named(&["video", "audio"]) {
            let kinds = track_kinds(media);
            let has = |kind: &str| kinds.iter().any(|k| k == kind);

            match media.value().name() {
                "video" => {
                    if !has("captions") {
                        issues.push(video_captions(media));
                    }
                    if !has("descriptions") {
                        issues.push(video_descriptions(media));
                    }
                }
                _ => {
                    if !has("captions") {
                        issues.push(audio_transcript(media));
                    }
                }
            }
        }
        issues
    }
}

/// Lowercased `kind` of every `<track>` inside the element.
fn track_kinds(media: ElementRef<'_>) -> Vec<String> {
    media
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "track")
        .filter_map(|track| track.value().attr("kind"))
        .map(|kind| kind.trim().to_ascii_lowercase())
        .collect()
}

fn video_captions(video: ElementRef<'_>) -> Issue {
    Issue::new(
        "custom-video-missing-captions",
        Severity::Critical,
        "Video element is missing a captions track.",
        "Deaf and hard-of-hearing users need synchronised captions for the dialogue and \
         meaningful sounds in a video.",
    )
    .help_url(wcag_url("captions-prerecorded"))
    .tags(&["wcag2a", "wcag122", "media"])
    .node(node_for(video, "Element has no <track kind=\"captions\">"))
    .suggestion(
        "Add a `<track kind=\"captions\" src=\"captions.vtt\" srclang=\"en\" label=\"English\">` element as a child of the `<video>` tag.",
        "Create a WebVTT caption file covering speech and relevant sound effects and reference \
         it from a `<track kind=\"captions\">` inside the `<video>`. Provide one track per \
         language and mark the main one with `default`.",
    )
}

fn video_descriptions(video: ElementRef<'_>) -> Issue {
    Issue::new(
        "custom-video-missing-descriptions",
        Severity::Moderate,
        "Video element is missing an audio descriptions track.",
        "Blind and low-vision users need important visual content in a video described, \
         through an audio description track or a described version of the video.",
    )
    .help_url(wcag_url("audio-description-or-media-alternative-prerecorded"))
    .tags(&["wcag2a", "wcag123", "media"])
    .node(node_for(video, "Element has no <track kind=\"descriptions\">"))
    .suggestion(
        "Add a `<track kind=\"descriptions\" src=\"descriptions.vtt\" srclang=\"en\" label=\"Audio Description\">` element as a child of the `<video>` tag.",
        "Write a WebVTT descriptions file narrating on-screen actions, text and scene changes \
         that the soundtrack does not convey, and reference it with `<track kind=\"descriptions\">`. \
         Alternatively link to a fully described version of the video.",
    )
}

fn audio_transcript(audio: ElementRef<'_>) -> Issue {
    Issue::new(
        "custom-audio-missing-transcript",
        Severity::Critical,
        "Audio element is missing a captions/transcript track.",
        "Deaf and hard-of-hearing users need a text alternative for spoken audio content.",
    )
    .help_url(wcag_url("audio-only-and-video-only-prerecorded"))
    .tags(&["wcag2a", "wcag121", "media"])
    .node(node_for(audio, "Element has no <track kind=\"captions\">"))
    .suggestion(
        "Add a `<track kind=\"captions\" src=\"transcript.vtt\" srclang=\"en\" label=\"Transcript\">` element as a child of the `<audio>` tag.",
        "Provide a transcript of the audio, either as a WebVTT `<track kind=\"captions\">` inside \
         the `<audio>` element or as a text transcript linked right next to the player.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ids;

    fn check(html: &str) -> Vec<Issue> {
        MediaCaptions.check(&Document::parse(html))
    }

    #[test]
    fn test_bare_video_and_audio() {
        let issues = check(r#"<video src="a.mp4"></video><audio src="b.mp3"></audio>"#);
        assert_eq!(
            ids(&issues),
            vec![
                "custom-video-missing-captions",
                "custom-video-missing-descriptions",
                "custom-audio-missing-transcript",
            ]
        );
        assert_eq!(issues[1].severity, Severity::Moderate);
    }

    #[test]
    fn test_tracks_satisfy_checks() {
        let html = r#"
            <video><source src="a.mp4"><track kind="Captions" src="c.vtt"><track kind="descriptions" src="d.vtt"></video>
            <audio><track kind="captions" src="t.vtt"></audio>"#;
        assert!(check(html).is_empty());
    }

    #[test]
    fn test_subtitles_are_not_captions() {
        let issues = check(r#"<video><track kind="subtitles" src="s.vtt"><track kind="descriptions" src="d.vtt"></video>"#);
        assert_eq!(ids(&issues), vec!["custom-video-missing-captions"]);
    }
}
