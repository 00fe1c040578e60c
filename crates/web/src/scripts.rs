//! Inline client behaviour. Every page gets `BASE_SCRIPT`; the others are
//! emitted by the pages that need them.

use crate::vm::PomodoroSettingsVm;

/// Toasts plus a JSON POST helper shared by the page scripts.
pub(crate) const BASE_SCRIPT: &str = r#"(function() {
    window.trackerToast = function(message, level) {
        let host = document.getElementById("toast-host");
        if (!host) {
            host = document.createElement("div");
            host.id = "toast-host";
            document.body.appendChild(host);
        }
        const toast = document.createElement("div");
        toast.className = "toast toast-" + (level || "info");
        toast.textContent = message;
        host.appendChild(toast);
        setTimeout(function() { toast.remove(); }, 3000);
    };
    window.trackerPost = async function(url, body) {
        const response = await fetch(url, {
            method: "POST",
            headers: { "Content-Type": "application/json" },
            credentials: "same-origin",
            body: JSON.stringify(body || {}),
        });
        const data = await response.json().catch(function() { return {}; });
        if (!response.ok) {
            throw new Error(data.error || ("Request failed (" + response.status + ")"));
        }
        return data;
    };
    document.querySelectorAll(".flash").forEach(function(el) {
        setTimeout(function() { el.classList.add("fade"); }, 5000);
    });
})();"#;

/// Saves a chapter flag as soon as its checkbox changes.
pub(crate) const CHAPTER_SCRIPT: &str = r#"(function() {
    document.querySelectorAll("input.chapter-flag").forEach(function(box) {
        box.addEventListener("change", async function() {
            const id = box.dataset.chapter;
            const field = box.dataset.field;
            const body = {};
            body[field] = box.checked;
            try {
                const data = await window.trackerPost("/update_chapter/" + id, body);
                const row = document.getElementById("chapter-" + id);
                if (row) {
                    row.classList.toggle("completed", data.is_completed);
                }
                window.trackerToast("Progress saved", "success");
            } catch (err) {
                box.checked = !box.checked;
                window.trackerToast(err.message, "danger");
            }
        });
    });
})();"#;

/// Inline revision form on the revision page.
pub(crate) const REVISION_SCRIPT: &str = r#"(function() {
    document.querySelectorAll("form.revision-form").forEach(function(form) {
        form.addEventListener("submit", async function(event) {
            event.preventDefault();
            const id = form.dataset.chapter;
            const level = parseInt(form.elements["confidence_level"].value, 10);
            const notes = form.elements["notes"].value;
            try {
                const data = await window.trackerPost("/log_revision/" + id, {
                    confidence_level: isNaN(level) ? null : level,
                    notes: notes,
                });
                const count = document.getElementById("revision-count-" + id);
                if (count) { count.textContent = data.revision_count; }
                const last = document.getElementById("last-revised-" + id);
                if (last) { last.textContent = data.last_revised; }
                form.reset();
                window.trackerToast("Revision logged", "success");
            } catch (err) {
                window.trackerToast(err.message, "danger");
            }
        });
    });
})();"#;

/// Fetch a stats endpoint and draw one series as a bar chart.
pub(crate) fn chart_script(endpoint: &str, target: &str, series: &str, unit: &str) -> String {
    format!(
        r#"(function() {{
    const target = document.getElementById({target:?});
    if (!target) {{ return; }}
    fetch({endpoint:?}, {{ credentials: "same-origin" }})
        .then(function(r) {{ return r.json(); }})
        .then(function(data) {{
            const values = data[{series:?}] || [];
            const labels = data.dates || [];
            target.innerHTML = "";
            if (values.length === 0) {{
                target.textContent = "No data yet.";
                return;
            }}
            const max = Math.max.apply(null, values.concat([1]));
            values.forEach(function(value, i) {{
                const bar = document.createElement("div");
                bar.className = "bar";
                bar.style.height = Math.round((value / max) * 100) + "%";
                bar.title = (labels[i] || "") + ": " + value + {unit:?};
                target.appendChild(bar);
            }});
        }})
        .catch(function() {{ target.textContent = "Could not load chart."; }});
}})();"#
    )
}

/// Countdown timer. Completed work intervals are posted to the server.
pub(crate) fn pomodoro_script(settings: PomodoroSettingsVm) -> String {
    let PomodoroSettingsVm {
        work_minutes,
        short_break_minutes,
        long_break_minutes,
        cycles_before_long_break,
    } = settings;
    format!(
        r#"(function() {{
    const lengths = {{
        work: {work_minutes} * 60,
        short: {short_break_minutes} * 60,
        long: {long_break_minutes} * 60,
    }};
    const cyclesBeforeLong = {cycles_before_long_break};
    const labels = {{ work: "Focus", short: "Short Break", long: "Long Break" }};
    const state = {{ phase: "work", remaining: lengths.work, cycles: 0, id: null }};
    const clock = document.getElementById("pomodoro-clock");
    const phase = document.getElementById("pomodoro-phase");
    const today = document.getElementById("pomodoro-today");
    const subject = document.getElementById("pomodoro-subject");
    const startBtn = document.getElementById("pomodoro-start");
    const pauseBtn = document.getElementById("pomodoro-pause");
    const resetBtn = document.getElementById("pomodoro-reset");
    if (!clock || !startBtn) {{ return; }}

    const render = function() {{
        const m = Math.floor(state.remaining / 60);
        const s = String(state.remaining % 60).padStart(2, "0");
        clock.textContent = String(m).padStart(2, "0") + ":" + s;
        if (phase) {{ phase.textContent = labels[state.phase]; }}
        document.title = clock.textContent + " - " + labels[state.phase];
    }};
    const stop = function() {{
        if (state.id) {{ clearInterval(state.id); state.id = null; }}
    }};
    const chosenSubject = function() {{
        return subject && subject.value ? subject.value : null;
    }};
    const finishPhase = async function() {{
        stop();
        if (state.phase === "work") {{
            state.cycles += 1;
            try {{
                const data = await window.trackerPost("/pomodoro/complete", {{ subject: chosenSubject() }});
                if (today) {{ today.textContent = data.sessions_today; }}
                window.trackerToast("Pomodoro complete! Take a break.", "success");
            }} catch (err) {{
                window.trackerToast(err.message, "danger");
            }}
            state.phase = state.cycles % cyclesBeforeLong === 0 ? "long" : "short";
        }} else {{
            state.phase = "work";
            window.trackerToast("Break over. Back to focus!", "info");
        }}
        state.remaining = lengths[state.phase];
        render();
    }};
    const tick = function() {{
        state.remaining -= 1;
        if (state.remaining <= 0) {{
            state.remaining = 0;
            render();
            finishPhase();
            return;
        }}
        render();
    }};

    startBtn.addEventListener("click", async function() {{
        if (state.id) {{ return; }}
        if (state.phase === "work" && state.remaining === lengths.work) {{
            try {{
                await window.trackerPost("/pomodoro/start", {{ subject: chosenSubject() }});
            }} catch (err) {{
                window.trackerToast(err.message, "danger");
                return;
            }}
        }}
        state.id = setInterval(tick, 1000);
    }});
    if (pauseBtn) {{ pauseBtn.addEventListener("click", stop); }}
    if (resetBtn) {{
        resetBtn.addEventListener("click", function() {{
            stop();
            state.phase = "work";
            state.cycles = 0;
            state.remaining = lengths.work;
            render();
        }});
    }}
    render();
}})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pomodoro_script_embeds_interval_lengths() {
        let script = pomodoro_script(PomodoroSettingsVm {
            work_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 30,
            cycles_before_long_break: 3,
        });
        assert!(script.contains("work: 50 * 60"));
        assert!(script.contains("const cyclesBeforeLong = 3;"));
    }

    #[test]
    fn chart_script_quotes_its_arguments() {
        let script = chart_script("/study_stats?days=30", "study-chart", "durations", " min");
        assert!(script.contains("\"/study_stats?days=30\""));
        assert!(script.contains("data[\"durations\"]"));
    }
}
