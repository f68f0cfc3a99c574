//! The single-page form served at `/`.

pub const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AI Triage Assistant</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 44rem; margin: 2rem auto; padding: 0 1rem; color: #1d2433; }
  h1 { font-size: 1.6rem; }
  textarea { width: 100%; min-height: 150px; font: inherit; padding: .5rem; box-sizing: border-box; }
  button { margin-top: .75rem; padding: .5rem 1.25rem; font: inherit; cursor: pointer; }
  .panel { margin-top: 1rem; padding: .75rem 1rem; border-radius: .4rem; }
  .success { background: #e7f6ec; border: 1px solid #9fd4b0; }
  .warning { background: #fff6e0; border: 1px solid #f0cf7a; }
  .error { background: #fdecec; border: 1px solid #eea3a3; }
  .hidden { display: none; }
  #assessment { font-weight: 600; white-space: pre-wrap; }
  #download { display: inline-block; margin-top: 1rem; }
</style>
</head>
<body>
<h1>&#129658; AI Triage Assistant</h1>
<p>Enter patient symptoms below to receive a triage level classification.</p>

<form id="triage-form">
  <label for="symptoms">Symptoms</label>
  <textarea id="symptoms" name="symptoms" placeholder="E.g. Chest pain and shortness of breath..."></textarea>
  <button type="submit" id="submit">Classify</button>
</form>

<div id="loading" class="panel hidden">Analyzing...</div>
<div id="warning" class="panel warning hidden"></div>
<div id="success" class="panel success hidden">
  <div>Classification Complete:</div>
  <div id="assessment"></div>
</div>
<div id="error" class="panel error hidden"></div>

<a id="download" href="/api/results.csv" download="triage_results.csv">Download Results CSV</a>

<script>
const form = document.getElementById("triage-form");
const panels = ["loading", "warning", "success", "error"].map(id => document.getElementById(id));
const [loading, warning, success, error] = panels;

function show(el, text) {
  panels.forEach(p => p.classList.add("hidden"));
  if (el) {
    if (text !== undefined && el !== success) el.textContent = text;
    el.classList.remove("hidden");
  }
}

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const symptoms = document.getElementById("symptoms").value;
  if (!symptoms.trim()) {
    show(warning, "Please enter some symptoms.");
    return;
  }
  document.getElementById("submit").disabled = true;
  show(loading);
  try {
    const resp = await fetch("/api/classify", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ symptoms }),
    });
    const body = await resp.json();
    if (resp.status === 400) {
      show(warning, body.message);
    } else if (body.ok) {
      document.getElementById("assessment").textContent = body.assessment;
      show(success);
    } else {
      show(error, body.message || body.assessment || "Classification failed.");
    }
  } catch (e) {
    show(error, "Error during classification: " + e);
  } finally {
    document.getElementById("submit").disabled = false;
  }
});
</script>
</body>
</html>
"##;
