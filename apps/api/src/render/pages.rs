use crate::analysis::analyzer::SpeechAnalysis;
use crate::models::video::VideoRow;
use crate::render::{encode_path_segment, escape_html, layout};

pub fn landing_page() -> String {
    layout(
        "Welcome",
        r#"<h1>Public Speaking Coach</h1>
<p>Record yourself giving a talk, upload the video, and get feedback on clarity,
pace and filler words. Keep notes on each attempt to track your progress.</p>
<p><a href="/upload">Upload a video</a> or <a href="/videos">browse your videos</a>.</p>"#,
    )
}

pub fn upload_page() -> String {
    layout(
        "Upload",
        r#"<h1>Upload a video</h1>
<p>Accepted formats: .mp4, .mov, .avi, .webm</p>
<form id="upload-form" action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".mp4,.mov,.avi,.webm" required>
    <button type="submit">Upload</button>
</form>
<p id="upload-result"></p>
<script>
document.getElementById("upload-form").addEventListener("submit", async (event) => {
    event.preventDefault();
    const result = document.getElementById("upload-result");
    result.textContent = "Uploading...";
    const response = await fetch("/upload", { method: "POST", body: new FormData(event.target) });
    const body = await response.json();
    if (response.ok) {
        result.innerHTML = "";
        const link = document.createElement("a");
        link.href = "/video/" + body.id;
        link.textContent = body.filename + " uploaded (" + body.size + " bytes)";
        result.appendChild(link);
    } else {
        result.textContent = "Upload failed: " + ((body.error && body.error.message) || response.status);
    }
});
</script>"#,
    )
}

pub fn videos_page(videos: &[VideoRow]) -> String {
    let body = if videos.is_empty() {
        r#"<h1>Your videos</h1>
<p>No videos yet. <a href="/upload">Upload your first one.</a></p>"#
            .to_string()
    } else {
        let rows: String = videos
            .iter()
            .map(|v| {
                format!(
                    r#"        <tr>
            <td><a href="/video/{id}">{name}</a></td>
            <td>{size}</td>
            <td>{date}</td>
            <td><a href="/analysis/{id}">Analysis</a> | <a href="/notes/{id}">Notes</a></td>
        </tr>
"#,
                    id = v.id,
                    name = escape_html(&v.filename),
                    size = human_size(v.filesize),
                    date = escape_html(&v.upload_date),
                )
            })
            .collect();
        format!(
            r#"<h1>Your videos</h1>
<table>
    <thead><tr><th>File</th><th>Size</th><th>Uploaded</th><th></th></tr></thead>
    <tbody>
{rows}    </tbody>
</table>"#
        )
    };
    layout("Videos", &body)
}

pub fn video_page(video: &VideoRow) -> String {
    let body = format!(
        r#"<h1>{name}</h1>
{player}
<p>{size} &middot; uploaded {date}</p>
<p><a href="/analysis/{id}">View analysis</a> | <a href="/notes/{id}">Notes</a></p>"#,
        name = escape_html(&video.filename),
        player = video_player(video),
        size = human_size(video.filesize),
        date = escape_html(&video.upload_date),
        id = video.id,
    );
    layout(&video.filename, &body)
}

pub fn analysis_page(video: &VideoRow, analysis: &SpeechAnalysis) -> String {
    let body = format!(
        r#"<h1>Analysis: {name}</h1>
{player}
<div class="metric">Clarity<strong>{clarity}/100</strong></div>
<div class="metric">Words per minute<strong>{wpm}</strong></div>
<div class="metric">Filler words<strong>{fillers}</strong></div>
<h2>Feedback</h2>
<p>{feedback}</p>
<p><a href="/notes/{id}">Add notes</a> | <a href="/video/{id}">Back to video</a></p>"#,
        name = escape_html(&video.filename),
        player = video_player(video),
        clarity = analysis.clarity_score,
        wpm = analysis.words_per_minute,
        fillers = analysis.filler_words,
        feedback = escape_html(&analysis.feedback),
        id = video.id,
    );
    layout("Analysis", &body)
}

pub fn notes_page(video: &VideoRow) -> String {
    let body = format!(
        r#"<h1>Notes: {name}</h1>
<form id="notes-form" action="/notes/{id}" method="post">
    <textarea name="notes">{notes}</textarea>
    <button type="submit">Save notes</button>
</form>
<p id="notes-result"></p>
<p><a href="/video/{id}">Back to video</a></p>
<script>
document.getElementById("notes-form").addEventListener("submit", async (event) => {{
    event.preventDefault();
    const response = await fetch(event.target.action, {{
        method: "POST",
        body: new URLSearchParams(new FormData(event.target)),
    }});
    document.getElementById("notes-result").textContent = response.ok ? "Saved." : "Save failed.";
}});
</script>"#,
        name = escape_html(&video.filename),
        id = video.id,
        notes = escape_html(&video.notes),
    );
    layout("Notes", &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<p class="error">{message}</p>
<p><a href="/videos">Back to videos</a></p>"#,
        title = escape_html(title),
        message = escape_html(message),
    );
    layout(title, &body)
}

fn video_player(video: &VideoRow) -> String {
    format!(
        r#"<video controls preload="metadata" src="/uploads/{src}"></video>"#,
        src = encode_path_segment(&video.filename),
    )
}

fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(name: &str, notes: &str) -> VideoRow {
        VideoRow {
            id: 7,
            filename: name.to_string(),
            filepath: format!("uploads/{name}"),
            filesize: 2048,
            upload_date: "2024-05-01T09:30:00.000000Z".to_string(),
            notes: notes.to_string(),
            analysis_data: "{}".to_string(),
        }
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_videos_page_empty_state() {
        let html = videos_page(&[]);
        assert!(html.contains("No videos yet"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_videos_page_lists_in_given_order() {
        let html = videos_page(&[video("b.mp4", ""), video("a.mp4", "")]);
        let b = html.find("b.mp4").unwrap();
        let a = html.find("a.mp4").unwrap();
        assert!(b < a);
        assert!(html.contains(r#"href="/analysis/7""#));
    }

    #[test]
    fn test_video_page_escapes_filename_and_encodes_src() {
        let html = video_page(&video("<x> talk.mp4", ""));
        assert!(html.contains("&lt;x&gt; talk.mp4"));
        assert!(html.contains(r#"src="/uploads/%3Cx%3E%20talk.mp4""#));
        assert!(!html.contains("<x>"));
    }

    #[test]
    fn test_notes_page_prefills_escaped_notes() {
        let html = notes_page(&video("talk.mp4", "</textarea><b>hi</b>"));
        assert!(html.contains("&lt;/textarea&gt;&lt;b&gt;hi&lt;/b&gt;</textarea>"));
        assert!(html.contains(r#"action="/notes/7""#));
    }

    #[test]
    fn test_analysis_page_shows_metrics() {
        let analysis = SpeechAnalysis {
            clarity_score: 85,
            words_per_minute: 120,
            filler_words: 12,
            feedback: "Slow down & breathe".to_string(),
        };
        let html = analysis_page(&video("talk.mp4", ""), &analysis);
        assert!(html.contains("85/100"));
        assert!(html.contains("<strong>120</strong>"));
        assert!(html.contains("<strong>12</strong>"));
        assert!(html.contains("Slow down &amp; breathe"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page("Analysis failed", "Analysis failed: disk <full>");
        assert!(html.contains(r#"<p class="error">Analysis failed: disk &lt;full&gt;</p>"#));
    }
}
