//! Embedded HTML/CSS/JS frontend for the supportlens dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>supportlens</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --surface-2: #1c2330;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #6366f1;
  --accent-soft: #818cf8;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app {
  max-width: 1200px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: flex-start;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 24px;
  font-weight: 600;
}

header .subtitle {
  color: var(--text-muted);
  font-size: 13px;
}

.badge {
  display: inline-flex;
  align-items: center;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }

.view { display: none; }
.view.active { display: block; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 {
  font-size: 16px;
  font-weight: 600;
  margin-bottom: 4px;
}
.card .hint {
  color: var(--text-muted);
  font-size: 12px;
  margin-bottom: 16px;
}

/* Input view */
.inputs {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
  gap: 16px;
}
textarea {
  width: 100%;
  height: 200px;
  resize: vertical;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 8px;
  font-family: var(--mono);
  font-size: 12px;
  tab-size: 12;
}
textarea:focus { outline: none; border-color: var(--accent); }

.error-box {
  display: none;
  margin: 16px 0;
  padding: 12px;
  border: 1px solid var(--red);
  border-radius: 6px;
  color: var(--red);
  text-align: center;
}
.error-box.show { display: block; }

/* Buttons */
.btn {
  padding: 8px 20px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
  transition: all 0.15s;
}
.btn:hover { border-color: var(--accent); }
.btn.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn.primary:hover { opacity: 0.9; }
.btn:disabled { opacity: 0.5; cursor: default; }
.btn-row { display: flex; justify-content: center; margin-top: 16px; }

/* KPI cards */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}
.stat-card .value {
  font-size: 28px;
  font-weight: 700;
  font-family: var(--mono);
  color: var(--accent-soft);
  line-height: 1.1;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}
.stat-card .value.green { color: var(--green); }
.stat-card .value.yellow { color: var(--yellow); }
.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

.results {
  display: grid;
  grid-template-columns: 2fr 3fr;
  gap: 16px;
}
@media (max-width: 900px) { .results { grid-template-columns: 1fr; } }

/* Donut */
.donut { display: flex; flex-direction: column; align-items: center; }
.donut svg path { cursor: pointer; transition: opacity 0.15s; }
.donut svg path:hover { opacity: 0.8; }
.donut-center-name { font-size: 13px; font-weight: 600; fill: var(--text); }
.donut-center-pct { font-size: 12px; fill: var(--text-muted); }
.legend { margin-top: 12px; font-size: 12px; color: var(--text-muted); width: 100%; }
.legend div { display: flex; justify-content: space-between; padding: 2px 0; }
.legend .swatch {
  display: inline-block;
  width: 10px;
  height: 10px;
  border-radius: 3px;
  margin-right: 6px;
  vertical-align: middle;
}

/* Topic list */
.topic-list { max-height: 260px; overflow-y: auto; }
.topic-row {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 6px 0;
  border-bottom: 1px solid var(--border);
}
.topic-row .name {
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
  padding-right: 12px;
}
.topic-row .views {
  font-family: var(--mono);
  background: var(--surface-2);
  padding: 2px 8px;
  border-radius: 4px;
  margin-right: 8px;
}
.topic-row .explain {
  border: none;
  background: transparent;
  color: var(--accent-soft);
  cursor: pointer;
  font-size: 16px;
}

/* AI panel */
.ai-block {
  margin-top: 16px;
  padding: 12px;
  border-radius: 6px;
  background: var(--surface-2);
  white-space: pre-wrap;
  font-size: 13px;
}
.ai-block h3 { font-size: 13px; margin-bottom: 6px; }
.ai-block.recs { border-left: 3px solid var(--green); }
.spinner {
  width: 28px;
  height: 28px;
  margin: 16px auto;
  border: 3px solid var(--border);
  border-top-color: var(--accent);
  border-radius: 50%;
  animation: spin 0.8s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }

/* Modal */
.modal-backdrop {
  display: none;
  position: fixed;
  inset: 0;
  background: rgba(0,0,0,0.6);
  align-items: center;
  justify-content: center;
  z-index: 10;
}
.modal-backdrop.show { display: flex; }
.modal {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  max-width: 640px;
  width: 90%;
  max-height: 80vh;
  overflow-y: auto;
  padding: 20px;
}
.modal-head { display: flex; justify-content: space-between; margin-bottom: 12px; }
.modal-head h2 { font-size: 16px; }
.modal-body { white-space: pre-wrap; font-size: 13px; }

/* Toast */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 10px 16px;
  border-radius: 6px;
  background: var(--surface);
  border: 1px solid var(--green);
  color: var(--green);
  opacity: 0;
  transition: opacity 0.2s;
  pointer-events: none;
}
.toast.show { opacity: 1; }
.toast.error { border-color: var(--red); color: var(--red); }
</style>
</head>
<body>
<div class="app">

  <!-- Input view -->
  <div class="view" id="view-input">
    <header>
      <div>
        <h1>Dynamic Data Analysis Dashboard</h1>
        <div class="subtitle">Paste your tab-separated data from a spreadsheet to generate an interactive report with AI-powered insights.</div>
      </div>
      <span class="badge" id="ai-badge">AI: ...</span>
    </header>

    <div class="inputs">
      <div class="card">
        <h2>1. Keyword Categories</h2>
        <textarea id="in-keywords"></textarea>
      </div>
      <div class="card">
        <h2>2. Trending Searches</h2>
        <textarea id="in-trending"></textarea>
      </div>
      <div class="card">
        <h2>3. Top Topics</h2>
        <textarea id="in-topics"></textarea>
      </div>
    </div>

    <div class="error-box" id="input-error"></div>
    <div class="btn-row">
      <button class="btn primary" id="btn-analyze">Analyze Data</button>
    </div>
  </div>

  <!-- Results view -->
  <div class="view" id="view-results">
    <header>
      <div>
        <h1>User Support &amp; Activity Dashboard</h1>
        <div class="subtitle">An overview of user-reported issues, search trends, and topic engagement.</div>
      </div>
      <button class="btn" id="btn-reset">Start Over</button>
    </header>

    <div class="stats-grid">
      <div class="stat-card">
        <div class="value" id="kpi-category">N/A</div>
        <div class="label">#1 Problem Category</div>
      </div>
      <div class="stat-card">
        <div class="value green" id="kpi-views">0</div>
        <div class="label">Total Topic Views</div>
      </div>
      <div class="stat-card">
        <div class="value yellow" id="kpi-searches">0</div>
        <div class="label">Total Searches</div>
      </div>
    </div>

    <div class="results">
      <div class="card">
        <h2>Problem Category Breakdown</h2>
        <div class="hint">Distribution of keywords by category.</div>
        <div class="donut" id="donut"></div>
      </div>

      <div>
        <div class="card">
          <h2>AI-Powered Analysis</h2>
          <div class="hint">Generate an AI summary and recommendations based on your data.</div>
          <button class="btn primary" id="btn-generate">Generate Analysis &amp; Recommendations</button>
          <div id="ai-output"></div>
        </div>

        <div class="card">
          <h2>Top Viewed Topics</h2>
          <div class="hint">Most viewed support topics. Click &#10024; for an AI explanation.</div>
          <div class="topic-list" id="topic-list"></div>
        </div>
      </div>
    </div>
  </div>

</div>

<!-- Explanation modal -->
<div class="modal-backdrop" id="modal">
  <div class="modal">
    <div class="modal-head">
      <h2 id="modal-title"></h2>
      <button class="btn" id="btn-modal-close">Close</button>
    </div>
    <div class="modal-body" id="modal-body"></div>
  </div>
</div>

<!-- Toast -->
<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let dashboard = null;
let activeSlice = 0;
let modalTopic = null;

const PLACEHOLDERS = {
  keywords: 'Category\tKeyword\nGIT/VC\tpush\nGIT/VC\tgit push\nAuthentication & Access\tAccess Token\nAuthentication & Access\ttoken\nProgramming & Development\tpip\nProgramming & Development\tpython\n...',
  trending: 'Term\tSearches\tCTR\npush\t79\t59.50%\npip\t50\t58%\nFunction Overview\t49\t36.80%\n...',
  topics: 'Topic\tViews\nI can\'t push\t266\nProjects: Collaboration with Version Control\t251\n403 error occurs when pushing\t190\n...',
};

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const data = await res.json();
  return { status: res.status, data };
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function fmt(n) {
  if (n === undefined || n === null) return '0';
  return n.toLocaleString();
}

function esc(s) {
  if (!s) return '';
  return s.replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

function showView(name) {
  document.querySelectorAll('.view').forEach(v => v.classList.remove('active'));
  document.getElementById('view-' + name).classList.add('active');
}

// ---------------------------------------------------------------------------
// Input view
// ---------------------------------------------------------------------------
function inputs() {
  return {
    keywords: document.getElementById('in-keywords').value,
    trending: document.getElementById('in-trending').value,
    topics: document.getElementById('in-topics').value,
  };
}

function setInputs(v) {
  document.getElementById('in-keywords').value = v.keywords || '';
  document.getElementById('in-trending').value = v.trending || '';
  document.getElementById('in-topics').value = v.topics || '';
}

function setError(msg) {
  const el = document.getElementById('input-error');
  el.textContent = msg || '';
  el.className = 'error-box' + (msg ? ' show' : '');
}

document.getElementById('btn-analyze').addEventListener('click', async () => {
  try {
    const { status, data } = await api('POST', '/api/analyze', inputs());
    if (status !== 200) {
      setError(data.error);
      return;
    }
    setError('');
    dashboard = data.dashboard;
    activeSlice = 0;
    renderResults();
    resetAiPanel();
    showView('results');
  } catch (e) {
    toast('Analyze failed: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Results view
// ---------------------------------------------------------------------------
function renderResults() {
  const a = dashboard.aggregates;
  document.getElementById('kpi-category').textContent = a.top_category;
  document.getElementById('kpi-category').title = a.top_category;
  document.getElementById('kpi-views').textContent = fmt(a.total_topic_views);
  document.getElementById('kpi-searches').textContent = fmt(a.total_searches);
  renderDonut();
  renderTopics();
}

function arcPath(cx, cy, r0, r1, start, end) {
  const large = end - start > Math.PI ? 1 : 0;
  const p = (r, t) => [cx + r * Math.sin(t), cy - r * Math.cos(t)];
  const [x0, y0] = p(r1, start), [x1, y1] = p(r1, end);
  const [x2, y2] = p(r0, end), [x3, y3] = p(r0, start);
  return `M${x0},${y0} A${r1},${r1} 0 ${large} 1 ${x1},${y1} L${x2},${y2} A${r0},${r0} 0 ${large} 0 ${x3},${y3} Z`;
}

function renderDonut() {
  const el = document.getElementById('donut');
  const slices = dashboard.category_slices;
  const total = slices.reduce((s, c) => s + c.value, 0);
  if (slices.length === 0 || total === 0) {
    el.innerHTML = '<div class="hint">No keyword data.</div>';
    return;
  }

  let angle = 0;
  const paths = slices.map((s, i) => {
    // A lone full slice cannot be drawn as one arc.
    const sweep = Math.min(s.value / total, 0.9999) * 2 * Math.PI;
    const outer = i === activeSlice ? 90 : 80;
    const d = arcPath(110, 110, 60, outer, angle, angle + sweep);
    angle += sweep;
    return `<path d="${d}" fill="${s.color}" data-idx="${i}"><title>${esc(s.name)}: ${s.value}</title></path>`;
  }).join('');

  const active = slices[activeSlice] || slices[0];
  el.innerHTML = `
    <svg width="220" height="220" viewBox="0 0 220 220">
      ${paths}
      <text x="110" y="106" text-anchor="middle" class="donut-center-name">${esc(active.name.slice(0, 18))}</text>
      <text x="110" y="124" text-anchor="middle" class="donut-center-pct">${active.value} (${active.percent.toFixed(2)}%)</text>
    </svg>
    <div class="legend">${slices.map(s =>
      `<div><span><span class="swatch" style="background:${s.color}"></span>${esc(s.name)}</span><span>${s.percent.toFixed(2)}%</span></div>`
    ).join('')}</div>`;

  el.querySelectorAll('path').forEach(p => p.addEventListener('mouseenter', () => {
    activeSlice = Number(p.dataset.idx);
    renderDonut();
  }));
}

function renderTopics() {
  const el = document.getElementById('topic-list');
  if (dashboard.topics.length === 0) {
    el.innerHTML = '<div class="hint">No topic data.</div>';
    return;
  }
  el.innerHTML = dashboard.topics.map((t, i) => `
    <div class="topic-row">
      <span class="name" title="${esc(t.topic)}">${i + 1}. ${esc(t.topic)}</span>
      <span style="display:flex;align-items:center">
        <span class="views">${t.views}</span>
        <button class="explain" data-idx="${i}" title="Explain with AI">&#10024;</button>
      </span>
    </div>`).join('');

  el.querySelectorAll('.explain').forEach(b => b.addEventListener('click', () => {
    explain(dashboard.topics[Number(b.dataset.idx)].topic);
  }));
}

document.getElementById('btn-reset').addEventListener('click', async () => {
  const { data } = await api('POST', '/api/reset');
  generation++;
  resetAiPanel();
  dashboard = null;
  setInputs(data.inputs);
  setError('');
  showView('input');
});

// ---------------------------------------------------------------------------
// AI panel
// ---------------------------------------------------------------------------
let generation = 0;

function resetAiPanel() {
  document.getElementById('ai-output').innerHTML = '';
  const btn = document.getElementById('btn-generate');
  btn.disabled = false;
  btn.textContent = 'Generate Analysis & Recommendations';
}

function renderAi(summary, recommendations, pending) {
  let html = pending ? '<div class="spinner"></div>' : '';
  if (summary) {
    html += `<div class="ai-block"><h3>Analysis Summary</h3>${esc(summary)}</div>`;
    if (recommendations) {
      html += `<div class="ai-block recs"><h3>Recommendations</h3>${esc(recommendations)}</div>`;
    }
  }
  document.getElementById('ai-output').innerHTML = html;
}

document.getElementById('btn-generate').addEventListener('click', async () => {
  const btn = document.getElementById('btn-generate');
  btn.disabled = true;
  btn.textContent = 'Generating...';
  renderAi('', '', true);
  const mine = ++generation;

  // The summary lands before the recommendations; poll to show it early.
  const poll = setInterval(async () => {
    const { data } = await api('GET', '/api/state');
    if (mine === generation && data.is_generating) renderAi(data.summary, '', true);
  }, 1000);

  try {
    const { status, data } = await api('POST', '/api/generate');
    if (mine !== generation) return;
    if (status !== 200) {
      toast(data.error, true);
      renderAi('', '', false);
    } else {
      renderAi(data.summary, data.recommendations, false);
    }
  } catch (e) {
    if (mine === generation) toast('Generation failed: ' + e.message, true);
  } finally {
    clearInterval(poll);
    if (mine === generation) {
      btn.disabled = false;
      btn.textContent = 'Generate Analysis & Recommendations';
    }
  }
});

// ---------------------------------------------------------------------------
// Explanation modal
// ---------------------------------------------------------------------------
async function explain(topic) {
  modalTopic = topic;
  document.getElementById('modal-title').textContent = topic;
  document.getElementById('modal-body').innerHTML = '<div class="spinner"></div>';
  document.getElementById('modal').className = 'modal-backdrop show';

  try {
    const { data } = await api('POST', '/api/explain', { topic });
    if (modalTopic !== topic) return;
    document.getElementById('modal-body').textContent = data.explanation || data.error;
  } catch (e) {
    if (modalTopic === topic) document.getElementById('modal-body').textContent = 'Error: ' + e.message;
  }
}

async function closeModal() {
  modalTopic = null;
  document.getElementById('modal').className = 'modal-backdrop';
  await api('POST', '/api/explain/close');
}

document.getElementById('btn-modal-close').addEventListener('click', closeModal);
document.getElementById('modal').addEventListener('click', e => {
  if (e.target.id === 'modal') closeModal();
});

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const { data } = await api('GET', '/api/health');
    const badge = document.getElementById('ai-badge');
    badge.textContent = data.ai_available ? 'AI: ready' : 'AI: unavailable';
    badge.className = 'badge ' + (data.ai_available ? 'ok' : 'warn');
    badge.title = data.ai_detail;
  } catch (e) {
    // Badge stays neutral.
  }
}

async function init() {
  document.getElementById('in-keywords').placeholder = PLACEHOLDERS.keywords;
  document.getElementById('in-trending').placeholder = PLACEHOLDERS.trending;
  document.getElementById('in-topics').placeholder = PLACEHOLDERS.topics;

  const { data } = await api('GET', '/api/state');
  setInputs(data.inputs);
  setError(data.error);
  if (data.analyzed) {
    dashboard = data.dashboard;
    renderResults();
    renderAi(data.summary, data.recommendations, data.is_generating);
    showView('results');
  } else {
    showView('input');
  }
  loadHealth();
}

init();
</script>
</body>
</html>
"##;
