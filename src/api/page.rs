//! Embedded single-page chat shell.
//!
//! One input, one submit button, one scrolling transcript. The page is a
//! thin client over the JSON API; everything interesting happens server-side.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Math &amp; Search Assistant</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
  #transcript { border: 1px solid #ccc; border-radius: 8px; padding: 1rem; height: 420px; overflow-y: auto; }
  .msg { margin: .5rem 0; padding: .5rem .75rem; border-radius: 8px; white-space: pre-wrap; }
  .user { background: #e8f0fe; text-align: right; }
  .assistant { background: #f1f3f4; }
  .error { background: #fdecea; color: #b3261e; }
  form { display: flex; gap: .5rem; margin-top: 1rem; }
  #question { flex: 1; padding: .5rem; }
  #key-row { margin-bottom: 1rem; }
</style>
</head>
<body>
<h1>Math &amp; Search Assistant</h1>
<div id="key-row">
  <input id="api-key" type="password" placeholder="Groq API key" size="40">
  <button id="start">Start session</button>
</div>
<div id="transcript"></div>
<form id="ask-form">
  <input id="question" placeholder="Enter your question" disabled>
  <button id="submit" disabled>Find my answer</button>
</form>
<script>
let sessionId = null;
const transcript = document.getElementById('transcript');
const question = document.getElementById('question');
const submit = document.getElementById('submit');

function show(role, content) {
  const div = document.createElement('div');
  div.className = 'msg ' + role;
  div.textContent = content;
  transcript.appendChild(div);
  transcript.scrollTop = transcript.scrollHeight;
}

document.getElementById('start').addEventListener('click', async () => {
  const key = document.getElementById('api-key').value;
  const res = await fetch('/api/sessions', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({api_key: key || null}),
  });
  const body = await res.json();
  sessionId = body.id;
  transcript.replaceChildren();
  show('assistant', body.greeting);
  question.disabled = false;
  submit.disabled = false;
});

document.getElementById('ask-form').addEventListener('submit', async (e) => {
  e.preventDefault();
  const q = question.value.trim();
  if (!q || !sessionId) return;
  show('user', q);
  question.value = '';
  submit.disabled = true;
  try {
    const res = await fetch(`/api/sessions/${sessionId}/ask`, {
      method: 'POST',
      headers: {'Content-Type': 'application/json'},
      body: JSON.stringify({question: q}),
    });
    const body = await res.json();
    if (res.ok) {
      show('assistant', body.answer);
    } else {
      show('error', body.error.message);
    }
  } catch (err) {
    show('error', 'Request failed: ' + err);
  } finally {
    submit.disabled = false;
  }
});
</script>
</body>
</html>
"#;
