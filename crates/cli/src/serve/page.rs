//! The commitment form page.

use time::Date;

use commitment_core::commitment_text;
use commitment_signature::{PadLayout, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Render the page for the given signing date. `reset_delay_ms` is how long
/// a success message stays up before the form clears.
pub(crate) fn render(today: Date, layout: PadLayout, reset_delay_ms: u64) -> String {
    let text = commitment_text(today);
    let mut lines = text.lines();
    let heading = lines.next().unwrap_or_default();
    let body: String = lines
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!("<p>{}</p>\n", escape_html(l)))
        .collect();

    let (pad, modal) = match layout {
        PadLayout::Inline => (INLINE_PAD, "false"),
        PadLayout::Modal => (MODAL_PAD, "true"),
    };

    PAGE_TEMPLATE
        .replace("{{HEADING}}", &escape_html(heading))
        .replace("{{BODY}}", &body)
        .replace("{{PAD}}", pad)
        .replace("{{MODAL}}", modal)
        .replace("{{RESET_DELAY_MS}}", &reset_delay_ms.to_string())
        .replace("{{WIDTH}}", &DEFAULT_WIDTH.to_string())
        .replace("{{HEIGHT}}", &DEFAULT_HEIGHT.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const INLINE_PAD: &str = r#"<canvas id="pad" width="{{WIDTH}}" height="{{HEIGHT}}"></canvas>
    <div><button type="button" id="clear">Hapus</button></div>"#;

// The modal canvas starts blank on every opening; only Simpan keeps what was drawn.
const MODAL_PAD: &str = r#"<div>
      <button type="button" id="open-pad">Tanda Tangan</button>
      <button type="button" id="clear">Hapus</button>
    </div>
    <div id="pad-modal" class="modal" hidden>
      <div class="modal-body">
        <canvas id="pad" width="{{WIDTH}}" height="{{HEIGHT}}"></canvas>
        <div>
          <button type="button" id="modal-save">Simpan</button>
          <button type="button" id="modal-cancel">Batal</button>
        </div>
      </div>
    </div>"#;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Komitmen Pegawai</title>
<style>
  body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }
  nav button { margin-right: .5rem; }
  .tab { display: none; }
  .tab.active { display: block; }
  label { display: block; margin-top: 1rem; font-weight: bold; }
  input { width: 100%; padding: .4rem; box-sizing: border-box; }
  canvas { border: 1px solid #999; background: #fff; touch-action: none; max-width: 100%; }
  #message { margin-top: 1rem; min-height: 1.5em; }
  .error { color: #b00020; }
  .ok { color: #1b5e20; }
  table { width: 100%; border-collapse: collapse; }
  td, th { border-bottom: 1px solid #ddd; padding: .4rem; text-align: left; }
  td img { max-height: 48px; }
  #preview { display: block; margin-top: .5rem; max-width: 100%; border: 1px dashed #bbb; }
  #preview[hidden] { display: none; }
  .modal { position: fixed; inset: 0; background: rgba(0, 0, 0, .5); display: flex; align-items: center; justify-content: center; }
  .modal[hidden] { display: none; }
  .modal-body { background: #fff; padding: 1rem; max-width: 95vw; }
</style>
</head>
<body>
<nav>
  <button type="button" data-tab="form">Form</button>
  <button type="button" data-tab="results">Hasil</button>
</nav>

<section id="form" class="tab active">
  <h2>{{HEADING}}</h2>
  {{BODY}}
  <form id="commitment-form">
    <label for="fullName">Nama Lengkap</label>
    <input id="fullName" name="fullName" autocomplete="name">
    <label for="position">Jabatan</label>
    <input id="position" name="position">
    <label>Tanda Tangan Digital</label>
    {{PAD}}
    <img id="preview" alt="pratinjau tanda tangan" hidden>
    <p><button type="submit" id="submit">Kirim</button></p>
  </form>
  <div id="message"></div>
</section>

<section id="results" class="tab">
  <h2>Hasil Komitmen</h2>
  <table>
    <thead><tr><th>Nama</th><th>Jabatan</th><th>Waktu</th><th>Tanda Tangan</th><th></th></tr></thead>
    <tbody id="rows"></tbody>
  </table>
</section>

<script>
(function () {
  const MODAL = {{MODAL}};
  const RESET_DELAY_MS = {{RESET_DELAY_MS}};
  const canvas = document.getElementById('pad');
  const ctx = canvas.getContext('2d');
  const form = document.getElementById('commitment-form');
  const message = document.getElementById('message');
  const submitButton = document.getElementById('submit');
  const preview = document.getElementById('preview');
  // `strokes` is what gets submitted; `drawing` is what is on the canvas.
  let strokes = [];
  let drawing = [];
  let current = null;

  ctx.lineWidth = 2;
  ctx.lineCap = 'round';
  ctx.lineJoin = 'round';
  ctx.strokeStyle = '#000000';

  function point(e) {
    const rect = canvas.getBoundingClientRect();
    const src = e.touches ? e.touches[0] : e;
    return {
      x: (src.clientX - rect.left) * canvas.width / rect.width,
      y: (src.clientY - rect.top) * canvas.height / rect.height,
    };
  }
  function start(e) {
    e.preventDefault();
    const p = point(e);
    current = [p];
    ctx.beginPath();
    ctx.moveTo(p.x, p.y);
  }
  function move(e) {
    if (!current) return;
    e.preventDefault();
    const p = point(e);
    current.push(p);
    ctx.lineTo(p.x, p.y);
    ctx.stroke();
  }
  function stop() {
    if (!current) return;
    drawing.push(current);
    current = null;
    if (!MODAL) commit();
  }
  function wipeCanvas() {
    drawing = [];
    current = null;
    ctx.clearRect(0, 0, canvas.width, canvas.height);
  }
  function commit() {
    strokes = drawing.slice();
    if (strokes.length > 0) {
      preview.src = canvas.toDataURL('image/png');
      preview.hidden = false;
    } else {
      preview.removeAttribute('src');
      preview.hidden = true;
    }
  }
  function clearPad() {
    wipeCanvas();
    commit();
  }

  canvas.addEventListener('mousedown', start);
  canvas.addEventListener('mousemove', move);
  canvas.addEventListener('mouseup', stop);
  canvas.addEventListener('mouseleave', stop);
  canvas.addEventListener('touchstart', start);
  canvas.addEventListener('touchmove', move);
  canvas.addEventListener('touchend', stop);
  document.getElementById('clear').addEventListener('click', clearPad);

  if (MODAL) {
    const modal = document.getElementById('pad-modal');
    document.getElementById('open-pad').addEventListener('click', function () {
      wipeCanvas();
      modal.hidden = false;
    });
    document.getElementById('modal-save').addEventListener('click', function () {
      commit();
      modal.hidden = true;
    });
    document.getElementById('modal-cancel').addEventListener('click', function () {
      wipeCanvas();
      modal.hidden = true;
    });
  }

  function show(text, cls) {
    message.textContent = text;
    message.className = cls;
  }

  form.addEventListener('submit', async function (e) {
    e.preventDefault();
    submitButton.disabled = true;
    show('Mengirim...', '');
    const body = {
      fullName: form.fullName.value,
      position: form.position.value,
      strokes: { width: canvas.width, height: canvas.height, strokes: strokes },
    };
    let succeeded = false;
    try {
      const res = await fetch('/submissions', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      const data = await res.json();
      if (res.ok) {
        succeeded = true;
        show('Komitmen berhasil dikirim (' + data.id + ')', 'ok');
        // The message stays up for the reset delay, then the form starts over.
        setTimeout(function () {
          form.reset();
          clearPad();
          show('', '');
          submitButton.disabled = false;
        }, RESET_DELAY_MS);
      } else {
        show(data.error, 'error');
      }
    } catch (err) {
      show(String(err), 'error');
    } finally {
      if (!succeeded) submitButton.disabled = false;
    }
  });

  async function loadResults() {
    const rows = document.getElementById('rows');
    rows.textContent = '';
    const res = await fetch('/submissions');
    const data = await res.json();
    for (const entry of data.submissions) {
      const tr = document.createElement('tr');
      for (const value of [entry.fullName, entry.position, new Date(entry.submittedAt).toLocaleString('id-ID')]) {
        const td = document.createElement('td');
        td.textContent = value;
        tr.appendChild(td);
      }
      const sig = document.createElement('td');
      if (entry.signatureUrl) {
        const img = document.createElement('img');
        img.src = entry.signatureUrl;
        img.alt = 'tanda tangan';
        sig.appendChild(img);
      }
      tr.appendChild(sig);
      const actions = document.createElement('td');
      const del = document.createElement('button');
      del.textContent = 'Hapus';
      del.addEventListener('click', async function () {
        if (!confirm('Hapus komitmen dari ' + entry.fullName + '?')) return;
        await fetch('/submissions/' + encodeURIComponent(entry.id), { method: 'DELETE' });
        loadResults();
      });
      actions.appendChild(del);
      tr.appendChild(actions);
      rows.appendChild(tr);
    }
  }

  document.querySelectorAll('nav button').forEach(function (button) {
    button.addEventListener('click', function () {
      document.querySelectorAll('.tab').forEach(function (tab) {
        tab.classList.toggle('active', tab.id === button.dataset.tab);
      });
      if (button.dataset.tab === 'results') loadResults();
    });
  });
})();
</script>
</body>
</html>
"##;
